pub mod root;
pub mod users;
pub mod announcements;

use uuid::Uuid;

use crate::error::AppError;

/// Identifiers are opaque to clients; one that is not a UUID simply cannot
/// match a row.
fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}
