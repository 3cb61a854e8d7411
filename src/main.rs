use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noticeboard::{
    api::{self, state::AppState},
    config::Settings,
    db,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noticeboard=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Noticeboard server on {}", settings.server.bind_address());

    // Initialize database
    let db_pool = db::connect(&settings.database).await?;

    // Create tables if absent; a broken schema aborts startup
    db::initialize_schema(&db_pool).await?;

    let app = api::create_app(AppState::from_pool(db_pool));

    let listener = tokio::net::TcpListener::bind(settings.server.bind_address()).await?;

    tracing::info!("Server listening on http://{}", settings.server.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
