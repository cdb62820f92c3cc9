//! Evaluated result of a finished competition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who won the competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Learner,
    Opponent,
    Draw,
}

impl Winner {
    /// Parses the persisted form. Accepts a few evaluator spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learner" | "user" | "student" => Some(Winner::Learner),
            "opponent" | "ai" | "bot" => Some(Winner::Opponent),
            "draw" | "tie" => Some(Winner::Draw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::Learner => "learner",
            Winner::Opponent => "opponent",
            Winner::Draw => "draw",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Points awarded to each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub learner: u32,
    pub opponent: u32,
}

impl Score {
    pub fn new(learner: u32, opponent: u32) -> Self {
        Self { learner, opponent }
    }
}

/// Winner, score and optional feedback returned by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Winner,
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Outcome {
    pub fn new(winner: Winner, score: Score) -> Self {
        Self {
            winner,
            score,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}
