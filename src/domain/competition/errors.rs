//! Competition-specific error types.

use thiserror::Error;

use crate::domain::foundation::{CompetitionId, DomainError, ErrorCode, QuestionId};

/// Errors surfaced by the caller-facing competition operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompetitionError {
    /// The store has no competition with this id.
    #[error("Competition not found: {0}")]
    NotFound(CompetitionId),

    /// Submitted question id is not the one currently in play.
    #[error(
        "Question mismatch: expected {}, got {}",
        .expected.as_ref().map_or("none", |q| q.as_str()),
        .submitted
    )]
    QuestionMismatch {
        expected: Option<QuestionId>,
        submitted: String,
    },

    /// Opponent answer generation failed during activation.
    #[error("Opponent answer generation failed for question {question_id}: {message}")]
    GenerationFailed {
        question_id: QuestionId,
        message: String,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl CompetitionError {
    pub fn not_found(id: CompetitionId) -> Self {
        CompetitionError::NotFound(id)
    }

    pub fn question_mismatch(expected: Option<QuestionId>, submitted: impl Into<String>) -> Self {
        CompetitionError::QuestionMismatch {
            expected,
            submitted: submitted.into(),
        }
    }

    pub fn generation_failed(question_id: QuestionId, message: impl Into<String>) -> Self {
        CompetitionError::GenerationFailed {
            question_id,
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        CompetitionError::InvalidState(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CompetitionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CompetitionError::NotFound(_) => ErrorCode::CompetitionNotFound,
            CompetitionError::QuestionMismatch { .. } => ErrorCode::QuestionMismatch,
            CompetitionError::GenerationFailed { .. } => ErrorCode::AIProviderError,
            CompetitionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            CompetitionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for CompetitionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::QuestionNotFound
            | ErrorCode::InvalidStateTransition
            | ErrorCode::CompetitionCompleted
            | ErrorCode::OutcomeAlreadyRecorded => CompetitionError::InvalidState(err.message),
            _ => CompetitionError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_variant() {
        let id = CompetitionId::new();
        let q = QuestionId::new("q1").unwrap();
        assert_eq!(CompetitionError::not_found(id).code(), ErrorCode::CompetitionNotFound);
        assert_eq!(
            CompetitionError::question_mismatch(Some(q.clone()), "q2").code(),
            ErrorCode::QuestionMismatch
        );
        assert_eq!(
            CompetitionError::generation_failed(q, "boom").code(),
            ErrorCode::AIProviderError
        );
    }

    #[test]
    fn domain_state_errors_become_invalid_state() {
        let err: CompetitionError =
            DomainError::new(ErrorCode::CompetitionCompleted, "already done").into();
        assert_eq!(err, CompetitionError::InvalidState("already done".into()));
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err: CompetitionError = DomainError::database("connection reset").into();
        assert!(matches!(err, CompetitionError::Infrastructure(msg) if msg.contains("connection reset")));
    }

    #[test]
    fn mismatch_message_names_both_ids() {
        let err = CompetitionError::question_mismatch(Some(QuestionId::new("q1").unwrap()), "nope");
        assert_eq!(err.to_string(), "Question mismatch: expected q1, got nope");

        let none = CompetitionError::question_mismatch(None, "q1");
        assert_eq!(none.to_string(), "Question mismatch: expected none, got q1");
    }
}
