//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCompetitionRepository` - competitions with JSONB question state

mod competition_repository;

pub use competition_repository::PostgresCompetitionRepository;
