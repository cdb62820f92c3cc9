//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers and the AI opponent built on them
//! - `clock` - system and manually driven clocks
//! - `http` - axum routes for the caller-facing operations
//! - `memory` - in-memory competition store
//! - `postgres` - PostgreSQL competition store

pub mod ai;
pub mod clock;
pub mod http;
pub mod memory;
pub mod postgres;

pub use clock::{ManualClock, SystemClock};
