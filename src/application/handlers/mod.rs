//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod competition;

pub use competition::{
    AnswerRecorder, CompetitionLocks, CompetitionService, CompetitionServiceConfig, Finalizer,
    ProgressionEngine, QuestionActivator,
};
