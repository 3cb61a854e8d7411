//! Connection setup, schema initialization and the small helpers every
//! repository shares: identifier and timestamp generation.

use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::{
    config::DatabaseConfig,
    error::{AppError, Result},
};

/// Format used for every `createdAt` / `updatedAt` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Open a pool against the configured database file, creating it if needed.
/// Foreign keys are switched on for every pooled connection.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create Users, Announcements and Archive if they are absent.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database schema ready");
    Ok(())
}

pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Current local wall-clock time truncated to whole seconds.
pub fn current_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        AppError::Internal(format!("Invalid timestamp '{}': {}", value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_has_second_precision() {
        let ts = current_timestamp();
        assert_eq!(ts.nanosecond(), 0);

        let formatted = format_timestamp(&ts);
        assert_eq!(formatted.len(), "2024-01-01 00:00:00".len());
        assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-01-01T10:00:00").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique_v4() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 4);
        assert_eq!(a.to_string().len(), 36);
    }
}
