//! Outcome evaluator port.

use async_trait::async_trait;

use crate::domain::competition::{Outcome, Question};
use crate::domain::foundation::{CompetitionId, DomainError};

/// Everything the evaluator sees: the questions and both answer lists,
/// index-aligned.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub competition_id: CompetitionId,
    pub questions: Vec<Question>,
    pub opponent_answers: Vec<String>,
    pub learner_answers: Vec<String>,
}

/// Scores a finished competition.
///
/// A failure here never rolls back completion; callers log and continue.
#[async_trait]
pub trait OutcomeEvaluator: Send + Sync {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Outcome, DomainError>;
}
