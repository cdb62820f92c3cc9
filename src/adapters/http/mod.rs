//! HTTP adapters - REST API implementations.

pub mod competition;

pub use competition::{competition_routes, CompetitionHandlers};
