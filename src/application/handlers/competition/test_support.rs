//! Shared mocks and fixture for competition handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    AnswerRecorder, CompetitionService, CompetitionServiceConfig, Finalizer, ProgressionEngine,
    QuestionActivator,
};
use crate::adapters::clock::ManualClock;
use crate::adapters::memory::InMemoryCompetitionRepository;
use crate::domain::competition::{Competition, CompetitionUpdate, Outcome, Question, Score, Winner};
use crate::domain::foundation::{
    CompetitionId, CourseId, DomainError, ErrorCode, QuestionId, Timestamp, UserId,
};
use crate::ports::{
    Clock, CompetitionRepository, EvaluationRequest, OpponentAnswerGenerator,
    OpponentAnswerRequest, OutcomeEvaluator,
};

pub const COURSE_CONTEXT: &str = "Data structures in Rust";
pub const DURATION: u64 = 600;

// ════════════════════════════════════════════════════════════════════════════
// Mock generator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockGenerator {
    calls: Mutex<Vec<OpponentAnswerRequest>>,
    fail_remaining: AtomicUsize,
}

impl MockGenerator {
    /// Fail the next `n` calls.
    pub fn fail_next(&self, n: usize) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<OpponentAnswerRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OpponentAnswerGenerator for MockGenerator {
    async fn generate(&self, request: OpponentAnswerRequest) -> Result<String, DomainError> {
        let answer = format!("opponent answer to {}", request.question.question_id);
        self.calls.lock().unwrap().push(request);

        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::new(ErrorCode::AIProviderError, "generator unavailable"));
        }
        Ok(answer)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Mock evaluator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockEvaluator {
    calls: Mutex<Vec<EvaluationRequest>>,
    fail: AtomicBool,
}

impl MockEvaluator {
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<EvaluationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutcomeEvaluator for MockEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Outcome, DomainError> {
        let answered = request
            .learner_answers
            .iter()
            .filter(|a| !a.is_empty())
            .count() as u32;
        self.calls.lock().unwrap().push(request);

        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::new(ErrorCode::AIProviderError, "evaluator unavailable"));
        }
        Ok(Outcome::new(Winner::Learner, Score::new(answered, 1)).with_feedback("Well played"))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Repository wrapper with write failures
// ════════════════════════════════════════════════════════════════════════════

/// Delegates to an in-memory store; fails updates when toggled.
pub struct FlakyRepository {
    pub inner: InMemoryCompetitionRepository,
    fail_updates: AtomicBool,
}

impl FlakyRepository {
    pub fn new(inner: InMemoryCompetitionRepository) -> Self {
        Self {
            inner,
            fail_updates: AtomicBool::new(false),
        }
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompetitionRepository for FlakyRepository {
    async fn find_by_id(&self, id: &CompetitionId) -> Result<Option<Competition>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_learner_and_course(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Competition>, DomainError> {
        self.inner.find_by_learner_and_course(learner_id, course_id).await
    }

    async fn create(&self, competition: &Competition) -> Result<(), DomainError> {
        self.inner.create(competition).await
    }

    async fn update_by_id(
        &self,
        id: &CompetitionId,
        update: CompetitionUpdate,
    ) -> Result<Option<Competition>, DomainError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DomainError::database("write failed"));
        }
        self.inner.update_by_id(id, update).await
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fixture
// ════════════════════════════════════════════════════════════════════════════

pub struct Fixture {
    pub repo: Arc<InMemoryCompetitionRepository>,
    pub generator: Arc<MockGenerator>,
    pub evaluator: Arc<MockEvaluator>,
    pub clock: ManualClock,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryCompetitionRepository::new()),
            generator: Arc::new(MockGenerator::default()),
            evaluator: Arc::new(MockEvaluator::default()),
            clock: ManualClock::new(Timestamp::from_unix_secs(1_700_000_000)),
        }
    }

    pub fn start(&self) -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000)
    }

    pub fn questions(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| Question::new(QuestionId::new(format!("q{}", i)).unwrap(), format!("Prompt {}", i)))
            .collect()
    }

    /// Stores a fresh pending competition with `n` questions.
    pub async fn seed(&self, n: usize) -> Competition {
        let competition = Competition::new(
            CompetitionId::new(),
            UserId::new(format!("learner-{}", self.repo.len().await)).unwrap(),
            CourseId::new("course-1").unwrap(),
            COURSE_CONTEXT,
            Self::questions(n),
            self.clock.now(),
        );
        self.repo.create(&competition).await.unwrap();
        competition
    }

    pub async fn stored(&self, id: &CompetitionId) -> Competition {
        self.repo.find_by_id(id).await.unwrap().unwrap()
    }

    fn repository(&self) -> Arc<dyn CompetitionRepository> {
        self.repo.clone()
    }

    fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(self.clock.clone())
    }

    pub fn activator(&self) -> QuestionActivator {
        QuestionActivator::new(self.repository(), self.generator.clone(), self.clock(), DURATION)
    }

    pub fn recorder(&self) -> AnswerRecorder {
        AnswerRecorder::new(self.repository(), self.clock())
    }

    pub fn finalizer(&self) -> Finalizer {
        Finalizer::new(self.repository(), self.evaluator.clone(), self.clock())
    }

    pub fn engine(&self) -> ProgressionEngine {
        ProgressionEngine::new(
            self.repository(),
            self.clock(),
            self.activator(),
            self.recorder(),
            self.finalizer(),
        )
    }

    pub fn service(&self) -> CompetitionService {
        CompetitionService::new(
            self.repository(),
            self.generator.clone(),
            self.evaluator.clone(),
            self.clock(),
            CompetitionServiceConfig::default(),
        )
    }
}
