//! Competition aggregate entity.
//!
//! A competition is one learner-versus-opponent match over a fixed list of
//! questions. Questions are answered one at a time; the question under the
//! pointer is activated lazily and expires after a fixed duration.
//!
//! Mutations never touch storage. Each returns a [`CompetitionUpdate`] with
//! the fields it changed so the caller can persist exactly those.

use crate::domain::foundation::{
    CompetitionId, CompetitionStatus, CourseId, DomainError, ErrorCode, QuestionStatus,
    StateMachine, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::{AnswerSheet, CompetitionUpdate, Outcome, Question};

/// Competition aggregate.
///
/// # Invariants
///
/// - `current_question_index` never decreases
/// - at most one question is active at any time
/// - question status only moves pending -> active -> completed
/// - once completed, question data never changes; the outcome may be
///   attached exactly once afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    id: CompetitionId,
    learner_id: UserId,
    course_id: CourseId,
    /// Free-text course description handed to the opponent generator.
    course_context: String,
    questions: Vec<Question>,
    current_question_index: usize,
    status: CompetitionStatus,
    started_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    /// Aggregate time budget, set at first activation.
    total_time_secs: Option<u64>,
    learner_answers: Vec<String>,
    opponent_answers: Vec<String>,
    outcome: Option<Outcome>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Competition {
    /// Create a new pending competition with its question list fixed.
    pub fn new(
        id: CompetitionId,
        learner_id: UserId,
        course_id: CourseId,
        course_context: impl Into<String>,
        questions: Vec<Question>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            learner_id,
            course_id,
            course_context: course_context.into(),
            questions,
            current_question_index: 0,
            status: CompetitionStatus::Pending,
            started_at: None,
            completed_at: None,
            total_time_secs: None,
            learner_answers: Vec::new(),
            opponent_answers: Vec::new(),
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a competition from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CompetitionId,
        learner_id: UserId,
        course_id: CourseId,
        course_context: String,
        questions: Vec<Question>,
        current_question_index: usize,
        status: CompetitionStatus,
        started_at: Option<Timestamp>,
        completed_at: Option<Timestamp>,
        total_time_secs: Option<u64>,
        learner_answers: Vec<String>,
        opponent_answers: Vec<String>,
        outcome: Option<Outcome>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            learner_id,
            course_id,
            course_context,
            questions,
            current_question_index,
            status,
            started_at,
            completed_at,
            total_time_secs,
            learner_answers,
            opponent_answers,
            outcome,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &CompetitionId {
        &self.id
    }

    pub fn learner_id(&self) -> &UserId {
        &self.learner_id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn course_context(&self) -> &str {
        &self.course_context
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn status(&self) -> CompetitionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn started_at(&self) -> Option<&Timestamp> {
        self.started_at.as_ref()
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn total_time_secs(&self) -> Option<u64> {
        self.total_time_secs
    }

    /// Stored learner answers, as of the last persisted mutation.
    pub fn learner_answers(&self) -> &[String] {
        &self.learner_answers
    }

    /// Stored opponent answers, as of the last persisted mutation.
    pub fn opponent_answers(&self) -> &[String] {
        &self.opponent_answers
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// The current pointer clamped into `[0, total - 1]`.
    ///
    /// Returns 0 for an empty competition.
    pub fn clamped_index(&self) -> usize {
        self.current_question_index
            .min(self.questions.len().saturating_sub(1))
    }

    /// Index and question of the active question, if any.
    pub fn active_question(&self) -> Option<(usize, &Question)> {
        self.questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.status().is_active())
    }

    pub fn active_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.status().is_active())
            .count()
    }

    /// Rebuilds both answer lists from question state.
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet::collect(&self.questions)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Activate the question at `index` with the opponent's answer.
    ///
    /// Already-active questions are left untouched and an empty update is
    /// returned. The first activation also moves the competition to
    /// in-progress and sets the aggregate timer.
    ///
    /// # Errors
    ///
    /// - `CompetitionCompleted` if the competition is finished
    /// - `QuestionNotFound` if `index` is out of range
    /// - `InvalidStateTransition` if the question is completed or another
    ///   question is still active
    pub fn activate_question(
        &mut self,
        index: usize,
        opponent_answer: String,
        now: Timestamp,
        duration_secs: u64,
    ) -> Result<CompetitionUpdate, DomainError> {
        self.ensure_mutable()?;
        let total = self.questions.len();

        let current = self.question_at(index)?.status();
        if current.is_active() {
            return Ok(CompetitionUpdate::default());
        }
        if let Some((active_index, _)) = self.active_question() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Question {} is still active; cannot activate question {}",
                    active_index, index
                ),
            ));
        }
        let next = current.transition_to(QuestionStatus::Active)?;

        let state = &mut self.questions[index].state;
        state.status = next;
        state.started_at = Some(now);
        state.expires_at = Some(now.plus_secs(duration_secs));
        state.opponent_answer = Some(opponent_answer);
        self.updated_at = now;

        let mut update = CompetitionUpdate {
            questions: Some(self.questions.clone()),
            updated_at: Some(now),
            ..Default::default()
        };

        if self.status == CompetitionStatus::Pending {
            self.status = self.status.transition_to(CompetitionStatus::InProgress)?;
            self.started_at = Some(now);
            self.total_time_secs = Some(duration_secs * total as u64);
            update.status = Some(self.status);
            update.started_at = self.started_at;
            update.total_time_secs = self.total_time_secs;
        }

        Ok(update)
    }

    /// Complete the question at `index` with the learner's answer.
    ///
    /// Returns `Ok(None)` when there is no question at `index`.
    ///
    /// # Errors
    ///
    /// - `CompetitionCompleted` if the competition is finished
    /// - `InvalidStateTransition` if the question is not active
    pub fn complete_question(
        &mut self,
        index: usize,
        answer: Option<String>,
        timed_out: bool,
        now: Timestamp,
    ) -> Result<Option<CompetitionUpdate>, DomainError> {
        let Some(question) = self.questions.get(index) else {
            return Ok(None);
        };
        self.ensure_mutable()?;
        let next = question.status().transition_to(QuestionStatus::Completed)?;

        let state = &mut self.questions[index].state;
        state.status = next;
        state.completed_at = Some(now);
        state.learner_answer = Some(answer.unwrap_or_default());
        state.timed_out = timed_out;

        let sheet = self.answer_sheet();
        self.learner_answers = sheet.learner_answers.clone();
        self.opponent_answers = sheet.opponent_answers.clone();
        self.updated_at = now;

        Ok(Some(CompetitionUpdate {
            questions: Some(self.questions.clone()),
            learner_answers: Some(sheet.learner_answers),
            opponent_answers: Some(sheet.opponent_answers),
            updated_at: Some(now),
            ..Default::default()
        }))
    }

    /// Move the question pointer forward to `index`.
    ///
    /// # Errors
    ///
    /// - `CompetitionCompleted` if the competition is finished
    /// - `QuestionNotFound` if `index` is out of range
    /// - `InvalidStateTransition` if `index` is behind the current pointer
    pub fn move_to(
        &mut self,
        index: usize,
        now: Timestamp,
    ) -> Result<CompetitionUpdate, DomainError> {
        self.ensure_mutable()?;
        self.question_at(index)?;
        if index < self.current_question_index {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Question pointer cannot move back from {} to {}",
                    self.current_question_index, index
                ),
            ));
        }

        self.current_question_index = index;
        self.updated_at = now;

        Ok(CompetitionUpdate {
            current_question_index: Some(index),
            updated_at: Some(now),
            ..Default::default()
        })
    }

    /// Mark the competition completed and lock in both answer lists.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already completed
    pub fn finish(&mut self, now: Timestamp) -> Result<CompetitionUpdate, DomainError> {
        self.status = self.status.transition_to(CompetitionStatus::Completed)?;

        let sheet = self.answer_sheet();
        self.learner_answers = sheet.learner_answers.clone();
        self.opponent_answers = sheet.opponent_answers.clone();
        self.completed_at = Some(now);
        self.updated_at = now;

        Ok(CompetitionUpdate {
            status: Some(CompetitionStatus::Completed),
            completed_at: Some(now),
            learner_answers: Some(sheet.learner_answers),
            opponent_answers: Some(sheet.opponent_answers),
            updated_at: Some(now),
            ..Default::default()
        })
    }

    /// Attach the evaluated outcome to a completed competition.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the competition is not completed
    /// - `OutcomeAlreadyRecorded` if an outcome is already attached
    pub fn record_outcome(
        &mut self,
        outcome: Outcome,
        now: Timestamp,
    ) -> Result<CompetitionUpdate, DomainError> {
        if !self.is_completed() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Outcome can only be recorded on a completed competition",
            ));
        }
        if self.outcome.is_some() {
            return Err(DomainError::new(
                ErrorCode::OutcomeAlreadyRecorded,
                format!("Competition {} already has an outcome", self.id),
            ));
        }

        self.outcome = Some(outcome.clone());
        self.updated_at = now;

        Ok(CompetitionUpdate {
            outcome: Some(outcome),
            updated_at: Some(now),
            ..Default::default()
        })
    }

    /// Merge a partial update into this competition.
    ///
    /// Used by stores to reproduce the persisted result of `update_by_id`.
    pub fn apply(&mut self, update: CompetitionUpdate) {
        if let Some(questions) = update.questions {
            self.questions = questions;
        }
        if let Some(index) = update.current_question_index {
            self.current_question_index = index;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(started_at) = update.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = Some(completed_at);
        }
        if let Some(total) = update.total_time_secs {
            self.total_time_secs = Some(total);
        }
        if let Some(answers) = update.learner_answers {
            self.learner_answers = answers;
        }
        if let Some(answers) = update.opponent_answers {
            self.opponent_answers = answers;
        }
        if let Some(outcome) = update.outcome {
            self.outcome = Some(outcome);
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = updated_at;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::CompetitionCompleted,
                format!("Competition {} is already completed", self.id),
            ))
        }
    }

    fn question_at(&self, index: usize) -> Result<&Question, DomainError> {
        self.questions.get(index).ok_or_else(|| {
            DomainError::new(
                ErrorCode::QuestionNotFound,
                format!("No question at index {} (total {})", index, self.questions.len()),
            )
        })
    }
}
