//! Answer sheet - the derived per-side answer lists.
//!
//! Never stored as a source of truth: always rebuilt by scanning every
//! question's state in order. One entry per question, absent answers
//! coalesced to the empty string.

use serde::{Deserialize, Serialize};

use super::Question;

/// Learner and opponent answers, index-aligned with the question list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub learner_answers: Vec<String>,
    pub opponent_answers: Vec<String>,
}

impl AnswerSheet {
    /// Scans every question and collects both sides' answers.
    pub fn collect(questions: &[Question]) -> Self {
        let (learner_answers, opponent_answers): (Vec<String>, Vec<String>) = questions
            .iter()
            .map(|q| {
                (
                    q.state.learner_answer_or_empty(),
                    q.state.opponent_answer_or_empty(),
                )
            })
            .unzip();

        Self {
            learner_answers,
            opponent_answers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.learner_answers.is_empty() && self.opponent_answers.is_empty()
    }
}
