use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{extract::JsonBody, response::ApiMessage, state::AppState},
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
};

use super::parse_id;

const NOT_FOUND: &str = "Announcement not found";

/// Urgent announcements first, then by soonest end date.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.announcement_repo.list().await?;

    Ok(Json(announcements))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Announcement>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let announcement = state.announcement_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAnnouncementRequest>,
) -> Result<(StatusCode, ApiMessage)> {
    let id = state.announcement_repo.create(request).await?;

    tracing::info!(announcement_id = %id, "Announcement created");

    Ok((StatusCode::CREATED, ApiMessage::success("Announcement created").with_id(id)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<UpdateAnnouncementRequest>,
) -> Result<ApiMessage> {
    if update.is_empty() {
        return Err(AppError::BadRequest("No valid fields provided for update".to_string()));
    }

    let id = parse_id(&id, NOT_FOUND)?;
    state.announcement_repo.update(id, update).await?;

    Ok(ApiMessage::success("Announcement updated"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiMessage> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.announcement_repo.delete(id).await?;

    tracing::info!(announcement_id = %id, "Announcement deleted");

    Ok(ApiMessage::success("Announcement deleted"))
}
