use async_trait::async_trait;
use sqlx::error::ErrorKind;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod announcement_repository;

pub use user_repository::SqliteUserRepository;
pub use announcement_repository::SqliteAnnouncementRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
    /// Fails with `NotFound` when no row has this id.
    async fn update(&self, id: Uuid, update: UpdateUserRequest) -> Result<()>;
    /// Fails with `NotFound` when no row has this id, `Conflict` when
    /// announcements still reference the user.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Returns the new id; the announcer name is only known through the join.
    async fn create(&self, announcement: CreateAnnouncementRequest) -> Result<Uuid>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    /// Urgent first, then soonest end date.
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn update(&self, id: Uuid, update: UpdateAnnouncementRequest) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Which storage constraint rejected a write, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    Unique,
    ForeignKey,
    Other,
}

pub(crate) fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let db_err = err.as_database_error()?;

    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(ConstraintViolation::Unique),
        ErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey),
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
            Some(ConstraintViolation::Other)
        }
        _ => None,
    }
}
