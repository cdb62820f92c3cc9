//! AnswerRecorder - moves the active question to completed.

use std::sync::Arc;

use tracing::{info, warn};

use super::persist;
use crate::domain::competition::{Competition, CompetitionError};
use crate::ports::{Clock, CompetitionRepository};

/// Closes the active question with the learner's answer.
///
/// Both answer lists are rebuilt from every question on each completion.
#[derive(Clone)]
pub struct AnswerRecorder {
    repository: Arc<dyn CompetitionRepository>,
    clock: Arc<dyn Clock>,
}

impl AnswerRecorder {
    pub fn new(repository: Arc<dyn CompetitionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Complete the question at `index` with `answer` (empty if `None`).
    ///
    /// A missing question is a no-op. Both answer lists are rebuilt from
    /// every question and written together with the question list.
    pub async fn complete(
        &self,
        mut competition: Competition,
        index: usize,
        answer: Option<String>,
        timed_out: bool,
    ) -> Result<Competition, CompetitionError> {
        let competition_id = *competition.id();
        let now = self.clock.now();

        let Some(update) = competition.complete_question(index, answer, timed_out, now)? else {
            return Ok(competition);
        };
        let competition = persist(&self.repository, competition, update).await?;

        if timed_out {
            warn!(%competition_id, index, "Question completed after expiry");
        } else {
            info!(%competition_id, index, "Question answered");
        }
        Ok(competition)
    }
}
