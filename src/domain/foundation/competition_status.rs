//! CompetitionStatus enum for tracking lifecycle of a competition.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl CompetitionStatus {
    /// Returns true while question data may still change.
    pub fn is_mutable(&self) -> bool {
        !matches!(self, CompetitionStatus::Completed)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CompetitionStatus::Completed)
    }

    /// Parses the persisted lowercase form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CompetitionStatus::Pending),
            "in_progress" => Some(CompetitionStatus::InProgress),
            "completed" => Some(CompetitionStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Pending => "pending",
            CompetitionStatus::InProgress => "in_progress",
            CompetitionStatus::Completed => "completed",
        }
    }
}

impl StateMachine for CompetitionStatus {
    /// Valid transitions:
    /// - Pending -> InProgress (first activation)
    /// - Pending -> Completed (empty question list)
    /// - InProgress -> Completed
    fn can_transition_to(&self, target: &Self) -> bool {
        use CompetitionStatus::*;
        matches!(
            (self, target),
            (Pending, InProgress) | (Pending, Completed) | (InProgress, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CompetitionStatus::*;
        match self {
            Pending => vec![InProgress, Completed],
            InProgress => vec![Completed],
            Completed => vec![],
        }
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
