//! Opponent answer generator port.

use async_trait::async_trait;

use crate::domain::competition::Question;
use crate::domain::foundation::{CompetitionId, DomainError};

/// Input for one opponent answer.
#[derive(Debug, Clone)]
pub struct OpponentAnswerRequest {
    pub competition_id: CompetitionId,
    /// Free-text description of the course the learner finished.
    pub course_context: String,
    pub question: Question,
}

/// Produces the opponent's answer to a question at activation time.
///
/// Failures propagate to the caller; the question stays pending.
#[async_trait]
pub trait OpponentAnswerGenerator: Send + Sync {
    async fn generate(&self, request: OpponentAnswerRequest) -> Result<String, DomainError>;
}
