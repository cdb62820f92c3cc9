//! ProgressionEngine - pointer advance and lazy expiry reconciliation.
//!
//! There is no background timer. A question that outlives its deadline
//! stays active in storage until the next `ensure_active` on its
//! competition closes it.

use std::sync::Arc;

use tracing::debug;

use super::{persist, AnswerRecorder, Finalizer, QuestionActivator};
use crate::domain::competition::{Competition, CompetitionError};
use crate::domain::foundation::QuestionStatus;
use crate::ports::{Clock, CompetitionRepository};

/// Drives the question pointer forward and resolves expiry on access.
#[derive(Clone)]
pub struct ProgressionEngine {
    repository: Arc<dyn CompetitionRepository>,
    clock: Arc<dyn Clock>,
    activator: QuestionActivator,
    recorder: AnswerRecorder,
    finalizer: Finalizer,
}

impl ProgressionEngine {
    pub fn new(
        repository: Arc<dyn CompetitionRepository>,
        clock: Arc<dyn Clock>,
        activator: QuestionActivator,
        recorder: AnswerRecorder,
        finalizer: Finalizer,
    ) -> Self {
        Self {
            repository,
            clock,
            activator,
            recorder,
            finalizer,
        }
    }

    pub fn recorder(&self) -> &AnswerRecorder {
        &self.recorder
    }

    /// Move past the current question.
    ///
    /// Past the last question this finalizes; otherwise the new pointer is
    /// persisted first and the question under it is activated.
    pub async fn advance(&self, mut competition: Competition) -> Result<Competition, CompetitionError> {
        if competition.is_completed() {
            return Ok(competition);
        }

        let competition_id = *competition.id();
        let next = competition.current_question_index() + 1;
        if next >= competition.total_questions() {
            return self.finalizer.finalize(competition).await;
        }

        let update = competition.move_to(next, self.clock.now())?;
        let competition = persist(&self.repository, competition, update).await?;
        debug!(%competition_id, index = next, "Advanced question pointer");

        self.activator.activate(competition, next).await
    }

    /// Resolve every time-driven transition that is due, then return.
    ///
    /// On return the competition is either completed or has an active,
    /// unexpired question under its pointer. Safe to call repeatedly: with
    /// no time elapsed the second call writes nothing.
    pub async fn ensure_active(
        &self,
        mut competition: Competition,
    ) -> Result<Competition, CompetitionError> {
        // Each pass either returns or moves the pointer forward by one.
        for _ in 0..=competition.total_questions() + 1 {
            if competition.is_completed() {
                return Ok(competition);
            }
            if competition.total_questions() == 0 {
                return self.finalizer.finalize(competition).await;
            }

            let index = competition.clamped_index();
            let Some(question) = competition.question(index) else {
                return self.finalizer.finalize(competition).await;
            };

            match question.status() {
                QuestionStatus::Pending => {
                    return self.activator.activate(competition, index).await;
                }
                QuestionStatus::Active => {
                    if !question.state.is_expired(&self.clock.now()) {
                        return Ok(competition);
                    }
                    let last_answer = question.state.learner_answer.clone();
                    competition = self
                        .recorder
                        .complete(competition, index, last_answer, true)
                        .await?;
                    competition = self.advance(competition).await?;
                }
                QuestionStatus::Completed => {
                    debug!(competition_id = %competition.id(), index, "Pointer behind completed question");
                    competition = self.advance(competition).await?;
                }
            }
        }

        Err(CompetitionError::invalid_state(format!(
            "Competition {} did not settle during reconciliation",
            competition.id()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::competition::test_support::*;
    use crate::domain::foundation::CompetitionStatus;

    #[tokio::test]
    async fn ensure_active_activates_first_question() {
        let fx = Fixture::new();
        let c = fx.seed(2).await;

        let c = fx.engine().ensure_active(c).await.unwrap();
        assert_eq!(c.status(), CompetitionStatus::InProgress);
        assert_eq!(c.active_question().map(|(i, _)| i), Some(0));
    }

    #[tokio::test]
    async fn ensure_active_is_idempotent_without_elapsed_time() {
        let fx = Fixture::new();
        let c = fx.seed(2).await;
        let engine = fx.engine();

        let first = engine.ensure_active(c).await.unwrap();
        let stored_after_first = fx.stored(first.id()).await;
        let second = engine.ensure_active(first).await.unwrap();

        assert_eq!(second, stored_after_first);
        assert_eq!(fx.stored(second.id()).await, stored_after_first);
        assert_eq!(fx.generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn expired_question_is_closed_and_next_activated() {
        let fx = Fixture::new();
        let c = fx.seed(2).await;
        let engine = fx.engine();
        let c = engine.ensure_active(c).await.unwrap();

        fx.clock.advance_secs(600);
        let c = engine.ensure_active(c).await.unwrap();

        let first = c.question(0).unwrap();
        assert_eq!(first.status(), QuestionStatus::Completed);
        assert!(first.state.timed_out);
        assert_eq!(first.state.learner_answer.as_deref(), Some(""));
        assert_eq!(c.current_question_index(), 1);
        assert_eq!(c.question(1).unwrap().status(), QuestionStatus::Active);
    }

    #[tokio::test]
    async fn expiry_of_last_question_finalizes() {
        let fx = Fixture::new();
        let c = fx.seed(1).await;
        let engine = fx.engine();
        let c = engine.ensure_active(c).await.unwrap();

        fx.clock.advance_secs(1_000);
        let c = engine.ensure_active(c).await.unwrap();

        assert!(c.is_completed());
        assert_eq!(fx.evaluator.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_competition_finalizes_without_collaborators() {
        let fx = Fixture::new();
        let c = fx.seed(0).await;

        let c = fx.engine().ensure_active(c).await.unwrap();
        assert!(c.is_completed());
        assert!(c.learner_answers().is_empty());
        assert!(fx.generator.calls().is_empty());
        assert!(fx.evaluator.calls().is_empty());
    }

    #[tokio::test]
    async fn lagging_pointer_catches_up() {
        let fx = Fixture::new();
        let c = fx.seed(3).await;
        let c = fx.activator().activate(c, 0).await.unwrap();
        // Crash between completing q1 and advancing the pointer.
        let c = fx.recorder().complete(c, 0, Some("a1".into()), false).await.unwrap();

        let c = fx.engine().ensure_active(c).await.unwrap();
        assert_eq!(c.current_question_index(), 1);
        assert_eq!(c.question(1).unwrap().status(), QuestionStatus::Active);
    }

    #[tokio::test]
    async fn advance_on_completed_competition_is_noop() {
        let fx = Fixture::new();
        let c = fx.seed(0).await;
        let engine = fx.engine();
        let c = engine.ensure_active(c).await.unwrap();

        let again = engine.advance(c.clone()).await.unwrap();
        assert_eq!(again, c);
    }

    #[tokio::test]
    async fn advance_persists_pointer_even_if_activation_fails() {
        let fx = Fixture::new();
        let c = fx.seed(2).await;
        let engine = fx.engine();
        let c = engine.ensure_active(c).await.unwrap();
        let c = fx.recorder().complete(c, 0, Some("a1".into()), false).await.unwrap();

        fx.generator.fail_next(1);
        let err = engine.advance(c.clone()).await.unwrap_err();
        assert!(matches!(err, CompetitionError::GenerationFailed { .. }));

        let stored = fx.stored(c.id()).await;
        assert_eq!(stored.current_question_index(), 1);
        assert_eq!(stored.question(1).unwrap().status(), QuestionStatus::Pending);

        let recovered = engine.ensure_active(stored).await.unwrap();
        assert_eq!(recovered.question(1).unwrap().status(), QuestionStatus::Active);
    }
}
