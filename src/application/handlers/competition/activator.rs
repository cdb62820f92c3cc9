//! QuestionActivator - moves one question from pending to active.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::persist;
use crate::domain::competition::{Competition, CompetitionError};
use crate::ports::{Clock, CompetitionRepository, OpponentAnswerGenerator, OpponentAnswerRequest};

/// Activates questions, asking the generator for the opponent's answer.
#[derive(Clone)]
pub struct QuestionActivator {
    repository: Arc<dyn CompetitionRepository>,
    generator: Arc<dyn OpponentAnswerGenerator>,
    clock: Arc<dyn Clock>,
    question_duration_secs: u64,
}

impl QuestionActivator {
    pub fn new(
        repository: Arc<dyn CompetitionRepository>,
        generator: Arc<dyn OpponentAnswerGenerator>,
        clock: Arc<dyn Clock>,
        question_duration_secs: u64,
    ) -> Self {
        Self {
            repository,
            generator,
            clock,
            question_duration_secs,
        }
    }

    /// Activate the question at `index`.
    ///
    /// Active and completed questions are returned unchanged. The generator
    /// is called before anything is written, so a generator failure leaves
    /// the question pending and the stored record untouched.
    ///
    /// # Errors
    ///
    /// - `GenerationFailed` if the opponent answer could not be produced
    /// - `InvalidState` if `index` is out of range or another question is active
    /// - `NotFound` / `Infrastructure` from persistence
    pub async fn activate(
        &self,
        mut competition: Competition,
        index: usize,
    ) -> Result<Competition, CompetitionError> {
        let competition_id = *competition.id();
        let question = competition
            .question(index)
            .ok_or_else(|| {
                CompetitionError::invalid_state(format!("No question at index {}", index))
            })?
            .clone();

        if question.status().is_active() {
            return Ok(competition);
        }
        if question.status().is_completed() {
            debug!(%competition_id, index, "Question already completed, not reactivating");
            return Ok(competition);
        }

        let question_id = question.question_id.clone();
        let request = OpponentAnswerRequest {
            competition_id,
            course_context: competition.course_context().to_string(),
            question,
        };
        let opponent_answer = self.generator.generate(request).await.map_err(|err| {
            warn!(%competition_id, %question_id, error = %err, "Opponent answer generation failed");
            CompetitionError::generation_failed(question_id.clone(), err.message)
        })?;

        let now = self.clock.now();
        let update = competition.activate_question(
            index,
            opponent_answer,
            now,
            self.question_duration_secs,
        )?;
        let competition = persist(&self.repository, competition, update).await?;

        info!(%competition_id, index, %question_id, "Question activated");
        Ok(competition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::competition::test_support::*;
    use crate::domain::foundation::{CompetitionStatus, QuestionStatus};

    #[tokio::test]
    async fn activates_pending_question_and_starts_competition() {
        let fx = Fixture::new();
        let c = fx.seed(3).await;
        let activator = fx.activator();

        let c = activator.activate(c, 0).await.unwrap();

        let q = c.question(0).unwrap();
        assert_eq!(q.status(), QuestionStatus::Active);
        assert_eq!(q.state.opponent_answer.as_deref(), Some("opponent answer to q1"));
        assert_eq!(q.state.expires_at, Some(fx.start().plus_secs(600)));
        assert_eq!(c.status(), CompetitionStatus::InProgress);
        assert_eq!(c.total_time_secs(), Some(1800));

        let stored = fx.stored(c.id()).await;
        assert_eq!(stored, c);
    }

    #[tokio::test]
    async fn passes_course_context_and_prompt_to_generator() {
        let fx = Fixture::new();
        let c = fx.seed(1).await;

        fx.activator().activate(c, 0).await.unwrap();

        let calls = fx.generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].course_context, COURSE_CONTEXT);
        assert_eq!(calls[0].question.prompt, "Prompt 1");
    }

    #[tokio::test]
    async fn already_active_question_skips_generator() {
        let fx = Fixture::new();
        let c = fx.seed(1).await;
        let activator = fx.activator();

        let c = activator.activate(c, 0).await.unwrap();
        let again = activator.activate(c.clone(), 0).await.unwrap();

        assert_eq!(again, c);
        assert_eq!(fx.generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn generator_failure_leaves_question_pending() {
        let fx = Fixture::new();
        fx.generator.fail_next(1);
        let c = fx.seed(2).await;

        let err = fx.activator().activate(c.clone(), 0).await.unwrap_err();
        assert!(matches!(err, CompetitionError::GenerationFailed { ref question_id, .. } if question_id.as_str() == "q1"));

        let stored = fx.stored(c.id()).await;
        assert_eq!(stored.question(0).unwrap().status(), QuestionStatus::Pending);
        assert_eq!(stored.status(), CompetitionStatus::Pending);
    }

    #[tokio::test]
    async fn out_of_range_index_is_invalid_state() {
        let fx = Fixture::new();
        let c = fx.seed(1).await;
        let err = fx.activator().activate(c, 5).await.unwrap_err();
        assert!(matches!(err, CompetitionError::InvalidState(_)));
        assert!(fx.generator.calls().is_empty());
    }
}
