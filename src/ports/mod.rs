//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CompetitionRepository` - competition persistence with partial updates
//! - `OpponentAnswerGenerator` - produces the opponent's answer at activation
//! - `OutcomeEvaluator` - scores a finished competition
//! - `Clock` - current time for expiry checks
//! - `AIProvider` - LLM completions used by the AI-backed opponent

mod ai_provider;
mod clock;
mod competition_repository;
mod opponent_answer_generator;
mod outcome_evaluator;

pub use ai_provider::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, CompletionResponse, FinishReason,
    Message, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use clock::Clock;
pub use competition_repository::CompetitionRepository;
pub use opponent_answer_generator::{OpponentAnswerGenerator, OpponentAnswerRequest};
pub use outcome_evaluator::{EvaluationRequest, OutcomeEvaluator};
