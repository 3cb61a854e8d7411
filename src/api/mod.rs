pub mod extract;
pub mod handlers;
pub mod response;
pub mod state;

use axum::{
    Router,
    routing::get,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};

use state::AppState;

pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/users", user_routes())
        .nest("/announcements", announcement_routes())

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::users::list).post(handlers::users::create))
        .route("/login/:email", get(handlers::users::get_by_email))
        .route(
            "/:id",
            get(handlers::users::get)
                .patch(handlers::users::update)
                .delete(handlers::users::delete),
        )
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::list).post(handlers::announcements::create))
        .route(
            "/:id",
            get(handlers::announcements::get)
                .patch(handlers::announcements::update)
                .delete(handlers::announcements::delete),
        )
}
