//! Competition handlers.
//!
//! The four mutating components share one repository and clock:
//!
//! - `QuestionActivator` - pending -> active, fetching the opponent answer
//! - `AnswerRecorder` - active -> completed, capturing the learner answer
//! - `ProgressionEngine` - pointer advance and lazy expiry reconciliation
//! - `Finalizer` - terminal transition and outcome evaluation
//!
//! `CompetitionService` wraps them into the caller-facing operations.

mod activator;
mod finalizer;
mod locks;
mod progression;
mod recorder;
mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use activator::QuestionActivator;
pub use finalizer::Finalizer;
pub use locks::CompetitionLocks;
pub use progression::ProgressionEngine;
pub use recorder::AnswerRecorder;
pub use service::{CompetitionService, CompetitionServiceConfig};

use std::sync::Arc;

use crate::domain::competition::{Competition, CompetitionError, CompetitionUpdate};
use crate::ports::CompetitionRepository;

/// Persists `update` and returns the stored record.
///
/// A no-op update skips the write and hands back `competition` unchanged.
async fn persist(
    repository: &Arc<dyn CompetitionRepository>,
    competition: Competition,
    update: CompetitionUpdate,
) -> Result<Competition, CompetitionError> {
    if update.is_noop() {
        return Ok(competition);
    }
    let id = *competition.id();
    repository
        .update_by_id(&id, update)
        .await?
        .ok_or(CompetitionError::NotFound(id))
}
