mod analyzer;
mod app;
mod config;
mod db;
mod error;
mod flash;
mod handlers;
mod views;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_analyzer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!(
        "Starting page analyzer on port {} (check timeout {} ms)",
        config.port,
        config.check_timeout.as_millis()
    );

    // Initialize database
    let db = db::connect(&config).await?;
    db::init_db(&db).await?;
    tracing::info!("Database initialized at {}", config.database_url);

    // Create shared state
    let state = Arc::new(app::AppState {
        config: config.clone(),
        db,
        client: analyzer::create_client(),
        views: views::Views::new()?,
    });

    let app = app::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Page analyzer listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
