use async_trait::async_trait;
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    auth,
    db,
    domain::{CreateUserRequest, Role, UpdateUserRequest, User},
    error::{AppError, Result},
    repository::{constraint_violation, ConstraintViolation, UserRepository},
};

// Database row struct that matches the Users table
#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    created_at: String,
    updated_at: String,
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Internal(e.to_string()))?,
            name: row.name,
            email: row.email,
            role: Role::parse(&row.role)
                .ok_or_else(|| AppError::Internal(format!("Invalid role: {}", row.role)))?,
            created_at: db::parse_timestamp(&row.created_at)?,
            updated_at: db::parse_timestamp(&row.updated_at)?,
        })
    }

    /// Unique-email violations are the only storage failure a client can cause here.
    fn map_write_error(err: sqlx::Error) -> AppError {
        match constraint_violation(&err) {
            Some(ConstraintViolation::Unique) => {
                AppError::Constraint("Email already exists".to_string())
            }
            Some(_) => AppError::Constraint("User constraints violated".to_string()),
            None => err.into(),
        }
    }

    async fn hash_optional(password: Option<&str>) -> Result<Option<String>> {
        match password {
            Some(password) => Ok(Some(auth::hash_password(password).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let id = db::generate_id();
        let now = db::current_timestamp();
        let now_str = db::format_timestamp(&now);
        let password_hash = Self::hash_optional(request.password.as_deref()).await?;

        sqlx::query(
            r#"
            INSERT INTO Users (id, name, email, password, role, createdAt, updatedAt)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(request.role.as_str())
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        tracing::debug!(user_id = %id, "created user");

        Ok(User {
            id,
            name: request.name,
            email: request.email,
            role: request.role,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role,
                   createdAt AS created_at, updatedAt AS updated_at
            FROM Users
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role,
                   createdAt AS created_at, updatedAt AS updated_at
            FROM Users
            WHERE email = ?
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, role,
                   createdAt AS created_at, updatedAt AS updated_at
            FROM Users
            ORDER BY createdAt ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_user)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateUserRequest) -> Result<()> {
        // Some(None) clears the password, Some(Some(_)) replaces it
        let (set_password, password_hash) = match &update.password {
            Some(password) => (true, Self::hash_optional(password.as_deref()).await?),
            None => (false, None),
        };
        let now_str = db::format_timestamp(&db::current_timestamp());

        let result = sqlx::query(
            r#"
            UPDATE Users
            SET name = COALESCE(?, name),
                email = COALESCE(?, email),
                password = CASE WHEN ? THEN ? ELSE password END,
                role = COALESCE(?, role),
                updatedAt = ?
            WHERE id = ?
            "#
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(set_password)
        .bind(&password_hash)
        .bind(update.role.map(|role| role.as_str()))
        .bind(&now_str)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM Users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::ForeignKey) => AppError::Conflict(
                    "User has announcements and cannot be deleted".to_string(),
                ),
                _ => err.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
