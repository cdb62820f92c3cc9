//! Application layer - Handlers composing domain operations and ports.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AnswerRecorder, CompetitionLocks, CompetitionService, CompetitionServiceConfig, Finalizer,
    ProgressionEngine, QuestionActivator,
};
