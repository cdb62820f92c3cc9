//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, status enums, and error types
//! that form the vocabulary of the competition domain.

mod competition_status;
mod errors;
mod ids;
mod question_status;
mod state_machine;
mod timestamp;

pub use competition_status::CompetitionStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CompetitionId, CourseId, QuestionId, UserId};
pub use question_status::QuestionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
