//! QuestionStatus enum for tracking a single question through a competition.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle of one question: pending, then active while the clock runs,
/// then completed once answered or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

impl QuestionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, QuestionStatus::Pending)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, QuestionStatus::Active)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, QuestionStatus::Completed)
    }

    /// Parses the persisted lowercase form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(QuestionStatus::Pending),
            "active" => Some(QuestionStatus::Active),
            "completed" => Some(QuestionStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Active => "active",
            QuestionStatus::Completed => "completed",
        }
    }
}

impl StateMachine for QuestionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use QuestionStatus::*;
        matches!((self, target), (Pending, Active) | (Active, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use QuestionStatus::*;
        match self {
            Pending => vec![Active],
            Active => vec![Completed],
            Completed => vec![],
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(QuestionStatus::default(), QuestionStatus::Pending);
    }

    #[test]
    fn moves_forward_only() {
        assert!(QuestionStatus::Pending.can_transition_to(&QuestionStatus::Active));
        assert!(QuestionStatus::Active.can_transition_to(&QuestionStatus::Completed));
        assert!(!QuestionStatus::Active.can_transition_to(&QuestionStatus::Pending));
        assert!(!QuestionStatus::Completed.can_transition_to(&QuestionStatus::Active));
    }

    #[test]
    fn cannot_skip_activation() {
        assert!(!QuestionStatus::Pending.can_transition_to(&QuestionStatus::Completed));
        assert!(QuestionStatus::Pending
            .transition_to(QuestionStatus::Completed)
            .is_err());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(QuestionStatus::Completed.is_terminal());
        assert!(!QuestionStatus::Active.is_terminal());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&QuestionStatus::Active).unwrap(),
            "\"active\""
        );
        let status: QuestionStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, QuestionStatus::Completed);
    }

    #[test]
    fn parse_matches_as_str() {
        for status in [
            QuestionStatus::Pending,
            QuestionStatus::Active,
            QuestionStatus::Completed,
        ] {
            assert_eq!(QuestionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(QuestionStatus::parse("archived"), None);
    }
}
