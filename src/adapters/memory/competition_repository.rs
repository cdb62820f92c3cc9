//! In-memory competition repository.
//!
//! Partial updates go through `CompetitionUpdate::apply_to`, so this store
//! merges exactly the way the Postgres adapter's `COALESCE` update does.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::competition::{Competition, CompetitionUpdate};
use crate::domain::foundation::{CompetitionId, CourseId, DomainError, ErrorCode, UserId};
use crate::ports::CompetitionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCompetitionRepository {
    competitions: Arc<RwLock<HashMap<CompetitionId, Competition>>>,
}

impl InMemoryCompetitionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored competitions.
    pub async fn len(&self) -> usize {
        self.competitions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.competitions.read().await.is_empty()
    }
}

#[async_trait]
impl CompetitionRepository for InMemoryCompetitionRepository {
    async fn find_by_id(&self, id: &CompetitionId) -> Result<Option<Competition>, DomainError> {
        Ok(self.competitions.read().await.get(id).cloned())
    }

    async fn find_by_learner_and_course(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Competition>, DomainError> {
        Ok(self
            .competitions
            .read()
            .await
            .values()
            .find(|c| c.learner_id() == learner_id && c.course_id() == course_id)
            .cloned())
    }

    async fn create(&self, competition: &Competition) -> Result<(), DomainError> {
        let mut competitions = self.competitions.write().await;

        let duplicate = competitions.values().any(|c| {
            c.learner_id() == competition.learner_id() && c.course_id() == competition.course_id()
        });
        if duplicate || competitions.contains_key(competition.id()) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "Competition already exists for this learner and course",
            )
            .with_detail("learner_id", competition.learner_id().as_str())
            .with_detail("course_id", competition.course_id().as_str()));
        }

        competitions.insert(*competition.id(), competition.clone());
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &CompetitionId,
        update: CompetitionUpdate,
    ) -> Result<Option<Competition>, DomainError> {
        let mut competitions = self.competitions.write().await;
        Ok(competitions.get_mut(id).map(|stored| {
            update.apply_to(stored);
            stored.clone()
        }))
    }
}
