use std::sync::Arc;
use sqlx::SqlitePool;

use crate::repository::{
    AnnouncementRepository, SqliteAnnouncementRepository, SqliteUserRepository, UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub db_pool: SqlitePool,
}

impl AppState {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        db_pool: SqlitePool,
    ) -> Self {
        Self {
            user_repo,
            announcement_repo,
            db_pool,
        }
    }

    /// SQLite-backed repositories sharing one pool.
    pub fn from_pool(db_pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteUserRepository::new(db_pool.clone())),
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone())),
            db_pool,
        )
    }
}
