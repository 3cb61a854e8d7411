use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Noticeboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Announcements and the users who post them",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "users": "/users",
            "announcements": "/announcements"
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Local::now().to_rfc3339();

    match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => (StatusCode::OK, Json(json!({
            "status": "healthy",
            "timestamp": timestamp
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
                "status": "unhealthy",
                "timestamp": timestamp
            })))
        }
    }
}
