use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{extract::JsonBody, response::ApiMessage, state::AppState},
    domain::{CreateUserRequest, UpdateUserRequest, UserProfile},
    error::{AppError, Result},
};

use super::parse_id;

const NOT_FOUND: &str = "User not found";

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserProfile>>> {
    let users = state.user_repo.list().await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let user = state.user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(user.into()))
}

/// Lookup by email. Despite the route name no password is checked.
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserProfile>> {
    let user = state.user_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(user.into()))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, ApiMessage)> {
    let user = state.user_repo.create(request).await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User created");

    Ok((StatusCode::CREATED, ApiMessage::success("User created").with_id(user.id)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<UpdateUserRequest>,
) -> Result<ApiMessage> {
    if update.is_empty() {
        return Err(AppError::BadRequest("No valid fields provided for update".to_string()));
    }

    let id = parse_id(&id, NOT_FOUND)?;
    state.user_repo.update(id, update).await?;

    Ok(ApiMessage::success("User updated"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiMessage> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.user_repo.delete(id).await?;

    tracing::info!(user_id = %id, "User deleted");

    Ok(ApiMessage::success("User deleted"))
}
