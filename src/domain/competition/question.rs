//! Question entity and its embedded per-question state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{QuestionId, QuestionStatus, Timestamp};

/// One challenge item: an immutable prompt plus mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: QuestionId,
    pub prompt: String,
    #[serde(default)]
    pub state: QuestionState,
}

impl Question {
    /// Creates a pending question.
    pub fn new(question_id: QuestionId, prompt: impl Into<String>) -> Self {
        Self {
            question_id,
            prompt: prompt.into(),
            state: QuestionState::default(),
        }
    }

    pub fn status(&self) -> QuestionStatus {
        self.state.status
    }
}

/// Mutable state of a question within one competition.
///
/// `started_at`/`expires_at` are only meaningful while active (they are kept
/// after completion for history). `opponent_answer` is written once, at
/// activation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionState {
    #[serde(default)]
    pub status: QuestionStatus,
    #[serde(default)]
    pub started_at: Option<Timestamp>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub opponent_answer: Option<String>,
    #[serde(default)]
    pub learner_answer: Option<String>,
    #[serde(default)]
    pub timed_out: bool,
}

impl QuestionState {
    /// Learner answer with the absent case coalesced to an empty string.
    pub fn learner_answer_or_empty(&self) -> String {
        self.learner_answer.clone().unwrap_or_default()
    }

    /// Opponent answer with the absent case coalesced to an empty string.
    pub fn opponent_answer_or_empty(&self) -> String {
        self.opponent_answer.clone().unwrap_or_default()
    }

    /// True when the question is active and its deadline has been reached.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        self.status.is_active()
            && self
                .expires_at
                .as_ref()
                .is_some_and(|expires_at| now >= expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(QuestionId::new("q1").unwrap(), "Reverse a linked list")
    }

    #[test]
    fn new_question_is_pending_with_empty_state() {
        let q = question();
        assert_eq!(q.status(), QuestionStatus::Pending);
        assert!(q.state.started_at.is_none());
        assert!(q.state.opponent_answer.is_none());
        assert!(!q.state.timed_out);
    }

    #[test]
    fn missing_answers_default_to_empty_string() {
        let state = QuestionState::default();
        assert_eq!(state.learner_answer_or_empty(), "");
        assert_eq!(state.opponent_answer_or_empty(), "");
    }

    #[test]
    fn expiry_is_inclusive_of_deadline() {
        let start = Timestamp::from_unix_secs(10_000);
        let state = QuestionState {
            status: QuestionStatus::Active,
            started_at: Some(start),
            expires_at: Some(start.plus_secs(600)),
            ..Default::default()
        };

        assert!(!state.is_expired(&start.plus_secs(599)));
        assert!(state.is_expired(&start.plus_secs(600)));
        assert!(state.is_expired(&start.plus_secs(601)));
    }

    #[test]
    fn pending_question_never_expires() {
        let state = QuestionState {
            expires_at: Some(Timestamp::from_unix_secs(1)),
            ..Default::default()
        };
        assert!(!state.is_expired(&Timestamp::from_unix_secs(10)));
    }

    #[test]
    fn deserializes_question_without_state() {
        let json = r#"{"question_id":"q9","prompt":"FizzBuzz"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.state, QuestionState::default());
    }
}
