//! In-memory adapters for tests and local runs.
//!
//! - **InMemoryCompetitionRepository** - competition store backed by a `HashMap`

mod competition_repository;

pub use competition_repository::InMemoryCompetitionRepository;
