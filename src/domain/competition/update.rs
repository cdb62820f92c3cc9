//! Partial-field update for a stored competition.
//!
//! Every domain mutation returns one of these describing exactly the fields
//! it touched. Stores merge `Some` fields and leave the rest alone, so two
//! writers touching different fields do not clobber each other.

use super::{Competition, Outcome, Question};
use crate::domain::foundation::{CompetitionStatus, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompetitionUpdate {
    pub questions: Option<Vec<Question>>,
    pub current_question_index: Option<usize>,
    pub status: Option<CompetitionStatus>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub total_time_secs: Option<u64>,
    pub learner_answers: Option<Vec<String>>,
    pub opponent_answers: Option<Vec<String>>,
    pub outcome: Option<Outcome>,
    pub updated_at: Option<Timestamp>,
}

impl CompetitionUpdate {
    /// True if the update carries no field changes (ignoring `updated_at`).
    pub fn is_noop(&self) -> bool {
        self.questions.is_none()
            && self.current_question_index.is_none()
            && self.status.is_none()
            && self.started_at.is_none()
            && self.completed_at.is_none()
            && self.total_time_secs.is_none()
            && self.learner_answers.is_none()
            && self.opponent_answers.is_none()
            && self.outcome.is_none()
    }

    /// Merges the `Some` fields into `competition`.
    pub fn apply_to(self, competition: &mut Competition) {
        competition.apply(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_update_is_noop() {
        assert!(CompetitionUpdate::default().is_noop());
    }

    #[test]
    fn timestamp_only_update_is_noop() {
        let update = CompetitionUpdate {
            updated_at: Some(Timestamp::now()),
            ..Default::default()
        };
        assert!(update.is_noop());
    }

    #[test]
    fn pointer_update_is_not_noop() {
        let update = CompetitionUpdate {
            current_question_index: Some(1),
            ..Default::default()
        };
        assert!(!update.is_noop());
    }
}
