//! PostgreSQL implementation of CompetitionRepository.
//!
//! Questions and both answer lists live in JSONB columns. Partial updates
//! bind `NULL` for untouched fields and `COALESCE` keeps the stored value,
//! so a single statement merges exactly the fields the caller set.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row};

use crate::domain::competition::{Competition, CompetitionUpdate, Outcome, Question, Score, Winner};
use crate::domain::foundation::{
    CompetitionId, CompetitionStatus, CourseId, DomainError, ErrorCode, Timestamp, UserId,
};
use crate::ports::CompetitionRepository;

const COLUMNS: &str = r#"
    id, learner_id, course_id, course_context, questions, current_question_index,
    status, started_at, completed_at, total_time_secs, learner_answers, opponent_answers,
    winner, learner_score, opponent_score, feedback, created_at, updated_at
"#;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PostgresCompetitionRepository {
    pool: PgPool,
}

impl PostgresCompetitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompetitionRepository for PostgresCompetitionRepository {
    async fn find_by_id(&self, id: &CompetitionId) -> Result<Option<Competition>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM competitions WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch competition: {}", e)))?;

        row.map(row_to_competition).transpose()
    }

    async fn find_by_learner_and_course(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Competition>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM competitions WHERE learner_id = $1 AND course_id = $2",
            COLUMNS
        ))
        .bind(learner_id.as_str())
        .bind(course_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch competition: {}", e)))?;

        row.map(row_to_competition).transpose()
    }

    async fn create(&self, competition: &Competition) -> Result<(), DomainError> {
        let outcome = competition.outcome();

        sqlx::query(
            r#"
            INSERT INTO competitions (
                id, learner_id, course_id, course_context, questions, current_question_index,
                status, started_at, completed_at, total_time_secs, learner_answers,
                opponent_answers, winner, learner_score, opponent_score, feedback,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(competition.id().as_uuid())
        .bind(competition.learner_id().as_str())
        .bind(competition.course_id().as_str())
        .bind(competition.course_context())
        .bind(Json(competition.questions()))
        .bind(competition.current_question_index() as i32)
        .bind(competition.status().as_str())
        .bind(competition.started_at().map(|t| *t.as_datetime()))
        .bind(competition.completed_at().map(|t| *t.as_datetime()))
        .bind(competition.total_time_secs().map(|s| s as i64))
        .bind(Json(competition.learner_answers()))
        .bind(Json(competition.opponent_answers()))
        .bind(outcome.map(|o| o.winner.as_str()))
        .bind(outcome.map(|o| o.score.learner as i32))
        .bind(outcome.map(|o| o.score.opponent as i32))
        .bind(outcome.and_then(|o| o.feedback.as_deref()))
        .bind(competition.created_at().as_datetime())
        .bind(competition.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .and_then(|db| db.code())
                .is_some_and(|code| code == UNIQUE_VIOLATION);
            if duplicate {
                DomainError::new(
                    ErrorCode::ValidationFailed,
                    "Competition already exists for this learner and course",
                )
            } else {
                DomainError::database(format!("Failed to insert competition: {}", e))
            }
        })?;

        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &CompetitionId,
        update: CompetitionUpdate,
    ) -> Result<Option<Competition>, DomainError> {
        let outcome = update.outcome.as_ref();

        let row = sqlx::query(&format!(
            r#"
            UPDATE competitions SET
                questions = COALESCE($2, questions),
                current_question_index = COALESCE($3, current_question_index),
                status = COALESCE($4, status),
                started_at = COALESCE($5, started_at),
                completed_at = COALESCE($6, completed_at),
                total_time_secs = COALESCE($7, total_time_secs),
                learner_answers = COALESCE($8, learner_answers),
                opponent_answers = COALESCE($9, opponent_answers),
                winner = COALESCE($10, winner),
                learner_score = COALESCE($11, learner_score),
                opponent_score = COALESCE($12, opponent_score),
                feedback = COALESCE($13, feedback),
                updated_at = COALESCE($14, updated_at)
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(update.questions.as_ref().map(Json))
        .bind(update.current_question_index.map(|i| i as i32))
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.started_at.map(|t| *t.as_datetime()))
        .bind(update.completed_at.map(|t| *t.as_datetime()))
        .bind(update.total_time_secs.map(|s| s as i64))
        .bind(update.learner_answers.as_ref().map(Json))
        .bind(update.opponent_answers.as_ref().map(Json))
        .bind(outcome.map(|o| o.winner.as_str()))
        .bind(outcome.map(|o| o.score.learner as i32))
        .bind(outcome.map(|o| o.score.opponent as i32))
        .bind(outcome.and_then(|o| o.feedback.as_deref()))
        .bind(update.updated_at.map(|t| *t.as_datetime()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update competition: {}", e)))?;

        row.map(row_to_competition).transpose()
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_competition(row: PgRow) -> Result<Competition, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let learner_id = UserId::new(column::<String>(&row, "learner_id")?)?;
    let course_id = CourseId::new(column::<String>(&row, "course_id")?)?;
    let questions: Json<Vec<Question>> = column(&row, "questions")?;
    let index: i32 = column(&row, "current_question_index")?;

    let status_str: String = column(&row, "status")?;
    let status = CompetitionStatus::parse(&status_str).ok_or_else(|| {
        DomainError::database(format!("Invalid competition status: {}", status_str))
    })?;

    let started_at: Option<chrono::DateTime<chrono::Utc>> = column(&row, "started_at")?;
    let completed_at: Option<chrono::DateTime<chrono::Utc>> = column(&row, "completed_at")?;
    let total_time_secs: Option<i64> = column(&row, "total_time_secs")?;
    let learner_answers: Json<Vec<String>> = column(&row, "learner_answers")?;
    let opponent_answers: Json<Vec<String>> = column(&row, "opponent_answers")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(&row, "updated_at")?;

    let outcome = outcome_from_columns(
        column(&row, "winner")?,
        column(&row, "learner_score")?,
        column(&row, "opponent_score")?,
        column(&row, "feedback")?,
    )?;

    Ok(Competition::reconstitute(
        CompetitionId::from_uuid(id),
        learner_id,
        course_id,
        column(&row, "course_context")?,
        questions.0,
        index.max(0) as usize,
        status,
        started_at.map(Timestamp::from_datetime),
        completed_at.map(Timestamp::from_datetime),
        total_time_secs.map(|s| s.max(0) as u64),
        learner_answers.0,
        opponent_answers.0,
        outcome,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

/// Outcome columns are all-or-nothing on the winner; scores default to 0.
fn outcome_from_columns(
    winner: Option<String>,
    learner_score: Option<i32>,
    opponent_score: Option<i32>,
    feedback: Option<String>,
) -> Result<Option<Outcome>, DomainError> {
    let Some(winner) = winner else {
        return Ok(None);
    };
    let winner = Winner::parse(&winner)
        .ok_or_else(|| DomainError::database(format!("Invalid winner: {}", winner)))?;
    let score = Score::new(
        learner_score.unwrap_or(0).max(0) as u32,
        opponent_score.unwrap_or(0).max(0) as u32,
    );

    let outcome = Outcome::new(winner, score);
    Ok(Some(match feedback {
        Some(feedback) => outcome.with_feedback(feedback),
        None => outcome,
    }))
}
