//! Competition repository port.
//!
//! Records are keyed by a random `CompetitionId`; the (learner, course) pair
//! is unique. Writes are partial: `update_by_id` merges only the fields the
//! caller set, so the repository never needs the whole aggregate to persist
//! a single transition.

use async_trait::async_trait;

use crate::domain::competition::{Competition, CompetitionUpdate};
use crate::domain::foundation::{CompetitionId, CourseId, DomainError, UserId};

#[async_trait]
pub trait CompetitionRepository: Send + Sync {
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &CompetitionId) -> Result<Option<Competition>, DomainError>;

    async fn find_by_learner_and_course(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Competition>, DomainError>;

    /// Insert a new competition.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the (learner, course) pair already exists
    /// - `DatabaseError` on persistence failure
    async fn create(&self, competition: &Competition) -> Result<(), DomainError>;

    /// Merge `update` into the stored record and return the result.
    ///
    /// Returns `None` if no record has this id.
    async fn update_by_id(
        &self,
        id: &CompetitionId,
        update: CompetitionUpdate,
    ) -> Result<Option<Competition>, DomainError>;
}
