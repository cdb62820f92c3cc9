//! CompetitionService - the caller-facing competition operations.
//!
//! Every operation loads the competition, runs reconciliation first, does
//! its own mutation, and returns a fresh view.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

use super::{AnswerRecorder, CompetitionLocks, Finalizer, ProgressionEngine, QuestionActivator};
use crate::domain::competition::{Competition, CompetitionError, CompetitionView, Question};
use crate::domain::foundation::{CompetitionId, CourseId, ErrorCode, UserId};
use crate::ports::{Clock, CompetitionRepository, OpponentAnswerGenerator, OutcomeEvaluator};

/// Service settings.
#[derive(Debug, Clone)]
pub struct CompetitionServiceConfig {
    /// Time budget per question.
    pub question_duration_secs: u64,
    /// Hold a per-competition lock for the duration of each operation.
    pub serialize_per_competition: bool,
}

impl Default for CompetitionServiceConfig {
    fn default() -> Self {
        Self {
            question_duration_secs: 600,
            serialize_per_competition: true,
        }
    }
}

/// Caller-facing competition operations.
///
/// Every operation reconciles expired questions before doing its own work
/// and answers with a fresh `CompetitionView`.
pub struct CompetitionService {
    repository: Arc<dyn CompetitionRepository>,
    clock: Arc<dyn Clock>,
    engine: ProgressionEngine,
    /// `None` when `serialize_per_competition` is off.
    locks: Option<CompetitionLocks>,
    config: CompetitionServiceConfig,
}

impl CompetitionService {
    pub fn new(
        repository: Arc<dyn CompetitionRepository>,
        generator: Arc<dyn OpponentAnswerGenerator>,
        evaluator: Arc<dyn OutcomeEvaluator>,
        clock: Arc<dyn Clock>,
        config: CompetitionServiceConfig,
    ) -> Self {
        let activator = QuestionActivator::new(
            repository.clone(),
            generator,
            clock.clone(),
            config.question_duration_secs,
        );
        let recorder = AnswerRecorder::new(repository.clone(), clock.clone());
        let finalizer = Finalizer::new(repository.clone(), evaluator, clock.clone());
        let engine = ProgressionEngine::new(
            repository.clone(),
            clock.clone(),
            activator,
            recorder,
            finalizer,
        );
        let locks = config
            .serialize_per_competition
            .then(CompetitionLocks::new);

        Self {
            repository,
            clock,
            engine,
            locks,
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Reconcile and return the current view.
    pub async fn start(&self, id: CompetitionId) -> Result<CompetitionView, CompetitionError> {
        let _guard = self.lock(id).await;

        let competition = self.load(id).await?;
        let competition = self.engine.ensure_active(competition).await?;
        Ok(self.view(&competition))
    }

    /// Record the learner's answer for the active question and move on.
    ///
    /// An answer for the question that was in play but has since timed out
    /// is dropped and the already-advanced view returned.
    ///
    /// # Errors
    ///
    /// - `QuestionMismatch` if `question_id` is not the active question;
    ///   nothing is written beyond what reconciliation already did
    pub async fn submit(
        &self,
        id: CompetitionId,
        question_id: &str,
        answer: impl Into<String>,
    ) -> Result<CompetitionView, CompetitionError> {
        let _guard = self.lock(id).await;

        let competition = self.load(id).await?;
        let in_play = competition.active_question().map(|(index, _)| index);
        let competition = self.engine.ensure_active(competition).await?;

        if closed_by_timeout(&competition, in_play, question_id) {
            debug!(competition_id = %id, submitted = question_id, "Answer arrived after the question expired");
            return Ok(self.view(&competition));
        }

        let active = competition
            .active_question()
            .map(|(index, q)| (index, q.question_id.clone()));
        let index = match active {
            Some((index, ref expected)) if expected.as_str() == question_id => index,
            other => {
                let expected = other.map(|(_, q)| q);
                debug!(competition_id = %id, submitted = question_id, "Rejected answer for inactive question");
                return Err(CompetitionError::question_mismatch(expected, question_id));
            }
        };

        let competition = self
            .recorder()
            .complete(competition, index, Some(answer.into()), false)
            .await?;
        let competition = self.engine.advance(competition).await?;
        Ok(self.view(&competition))
    }

    /// Close every remaining question and finalize.
    ///
    /// Pending questions are still activated on the way so the opponent has
    /// an answer for each; the learner's side is whatever was last recorded.
    pub async fn force_complete(&self, id: CompetitionId) -> Result<CompetitionView, CompetitionError> {
        let _guard = self.lock(id).await;

        let mut competition = self.load(id).await?;
        for _ in 0..=competition.total_questions() {
            competition = self.engine.ensure_active(competition).await?;
            if competition.is_completed() {
                break;
            }

            if let Some((index, question)) = competition.active_question() {
                let last_answer = question.state.learner_answer.clone();
                competition = self
                    .recorder()
                    .complete(competition, index, last_answer, true)
                    .await?;
            }
            competition = self.engine.advance(competition).await?;
        }

        if !competition.is_completed() {
            return Err(CompetitionError::invalid_state(format!(
                "Competition {} could not be force-completed",
                id
            )));
        }
        info!(competition_id = %id, "Competition force-completed");
        Ok(self.view(&competition))
    }

    /// Return the learner's competition for a course, creating it if needed.
    ///
    /// The question list is fixed at creation; later calls ignore
    /// `questions` and return the existing record.
    pub async fn open_for_course(
        &self,
        learner_id: UserId,
        course_id: CourseId,
        course_context: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Competition, CompetitionError> {
        if let Some(existing) = self
            .repository
            .find_by_learner_and_course(&learner_id, &course_id)
            .await?
        {
            return Ok(existing);
        }

        let mut seen = HashSet::new();
        if let Some(dup) = questions.iter().find(|q| !seen.insert(q.question_id.clone())) {
            return Err(CompetitionError::invalid_state(format!(
                "Duplicate question id {}",
                dup.question_id
            )));
        }

        let competition = Competition::new(
            CompetitionId::new(),
            learner_id,
            course_id,
            course_context,
            questions,
            self.clock.now(),
        );

        match self.repository.create(&competition).await {
            Ok(()) => {
                info!(
                    competition_id = %competition.id(),
                    learner_id = %competition.learner_id(),
                    course_id = %competition.course_id(),
                    total_questions = competition.total_questions(),
                    "Competition created"
                );
                Ok(competition)
            }
            // Lost a creation race for the same pair.
            Err(err) if err.code == ErrorCode::ValidationFailed => self
                .repository
                .find_by_learner_and_course(competition.learner_id(), competition.course_id())
                .await?
                .ok_or_else(|| CompetitionError::from(err)),
            Err(err) => Err(err.into()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn recorder(&self) -> &AnswerRecorder {
        self.engine.recorder()
    }

    async fn lock(&self, id: CompetitionId) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(id).await),
            None => None,
        }
    }

    async fn load(&self, id: CompetitionId) -> Result<Competition, CompetitionError> {
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(CompetitionError::NotFound(id))
    }

    fn view(&self, competition: &Competition) -> CompetitionView {
        CompetitionView::project(competition, self.config.question_duration_secs, self.clock.now())
    }
}

/// True if `question_id` names the question that was active at `in_play`
/// and reconciliation just closed it on expiry.
fn closed_by_timeout(
    competition: &Competition,
    in_play: Option<usize>,
    question_id: &str,
) -> bool {
    in_play
        .and_then(|index| competition.question(index))
        .is_some_and(|q| {
            q.question_id.as_str() == question_id
                && q.status().is_completed()
                && q.state.timed_out
        })
}
