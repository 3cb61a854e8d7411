use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    db,
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
    repository::{constraint_violation, AnnouncementRepository},
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    body: String,
    image: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    is_urgent: i32,
    announcer_id: String,
    announcer: String,
    created_at: String,
    updated_at: String,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Internal(e.to_string()))?,
            title: row.title,
            body: row.body,
            image: row.image,
            start_date: row.start_date,
            end_date: row.end_date,
            is_urgent: row.is_urgent != 0,
            announcer_id: Uuid::parse_str(&row.announcer_id)
                .map_err(|e| AppError::Internal(e.to_string()))?,
            announcer: row.announcer,
            created_at: db::parse_timestamp(&row.created_at)?,
            updated_at: db::parse_timestamp(&row.updated_at)?,
        })
    }

    fn map_write_error(err: sqlx::Error) -> AppError {
        match constraint_violation(&err) {
            Some(_) => AppError::Constraint(
                "Invalid announcer ID or other constraints violated".to_string(),
            ),
            None => err.into(),
        }
    }
}

const SELECT_JOINED: &str = r#"
    SELECT a.id, a.title, a.body, a.image,
           a.startDate AS start_date, a.endDate AS end_date,
           a.isUrgent AS is_urgent, a.announcerId AS announcer_id,
           u.name AS announcer,
           a.createdAt AS created_at, a.updatedAt AS updated_at
    FROM Announcements a
    JOIN Users u ON a.announcerId = u.id
"#;

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, request: CreateAnnouncementRequest) -> Result<Uuid> {
        let id = db::generate_id();
        let now_str = db::format_timestamp(&db::current_timestamp());

        sqlx::query(
            r#"
            INSERT INTO Announcements (
                id, title, body, image, startDate, endDate,
                isUrgent, announcerId, createdAt, updatedAt
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&request.title)
        .bind(&request.body)
        .bind(&request.image)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.is_urgent)
        .bind(request.announcer_id.to_string())
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        tracing::debug!(announcement_id = %id, announcer_id = %request.announcer_id, "created announcement");

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let query = format!("{} WHERE a.id = ?", SELECT_JOINED);
        let row = sqlx::query_as::<_, AnnouncementRow>(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_announcement).transpose()
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        let query = format!(
            "{} ORDER BY a.isUrgent DESC, a.endDate ASC, a.createdAt ASC",
            SELECT_JOINED
        );
        let rows = sqlx::query_as::<_, AnnouncementRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateAnnouncementRequest) -> Result<()> {
        let (set_image, image) = match update.image {
            Some(image) => (true, image),
            None => (false, None),
        };
        let now_str = db::format_timestamp(&db::current_timestamp());

        let result = sqlx::query(
            r#"
            UPDATE Announcements
            SET title = COALESCE(?, title),
                body = COALESCE(?, body),
                image = CASE WHEN ? THEN ? ELSE image END,
                startDate = COALESCE(?, startDate),
                endDate = COALESCE(?, endDate),
                isUrgent = COALESCE(?, isUrgent),
                announcerId = COALESCE(?, announcerId),
                updatedAt = ?
            WHERE id = ?
            "#
        )
        .bind(&update.title)
        .bind(&update.body)
        .bind(set_image)
        .bind(&image)
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(update.is_urgent)
        .bind(update.announcer_id.map(|announcer_id| announcer_id.to_string()))
        .bind(&now_str)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM Announcements WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        Ok(())
    }
}
