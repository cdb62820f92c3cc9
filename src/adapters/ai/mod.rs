//! AI adapters.
//!
//! - `AnthropicProvider` - `AIProvider` over the Anthropic Messages API
//! - `MockAIProvider` - queued responses for tests and local runs
//! - `AiOpponent` - opponent answer generator and outcome evaluator on any provider

mod ai_opponent;
mod anthropic_provider;
mod mock_provider;

pub use ai_opponent::AiOpponent;
pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockResponse};
