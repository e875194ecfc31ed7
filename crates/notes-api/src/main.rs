//! # notes-api: Binary Entry Point
//!
//! Loads configuration, connects storage, and starts the Axum HTTP server.
//! Binds to the configured port (default 8080).

use notes_api::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration is loaded before logging so the format can be chosen.
    // Nothing is logged during loading; load errors surface through the
    // returned error.
    let config = AppConfig::load()?;

    // Initialize structured tracing.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if config.log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    match &config.source {
        Some(path) => tracing::info!(path = %path.display(), "configuration file loaded"),
        None => tracing::info!("no configuration file found, using defaults and environment"),
    }
    tracing::info!(config = ?config, "configuration loaded");

    // Initialize database pool (optional: absent means in-memory only).
    let db_url = config.database.connection_url();
    let db_pool = notes_api::db::init_pool(db_url.as_deref()).await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let state = notes_api::bootstrap::bootstrap(&config, db_pool).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = notes_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.application.port));
    tracing::info!("Notes API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
