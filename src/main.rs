//! FitCompanion
//!
//! REST server for workout, meal and body progress tracking.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fitcompanion::ai::OpenAiClient;
use fitcompanion::build_info;
use fitcompanion::config::Config;
use fitcompanion::db::{self, Database};
use fitcompanion::http::{build_router, AppState};
use fitcompanion::services::status::StatusTracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fitcompanion=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::log_startup_banner();

    let config = Config::from_env()?;

    let database = match &config.database_path {
        Some(path) => {
            tracing::info!("Using database file {}", path.display());
            // Ensure data directory exists
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Database::new(path)?
        }
        None => {
            tracing::info!("Using in-memory database");
            Database::in_memory()?
        }
    };

    let version = db::initialize(&database)?;
    tracing::info!("Database schema version: {}", version);

    let state = AppState {
        db: database,
        ai: Arc::new(OpenAiClient::new(config.openai.clone())?),
        status: Arc::new(StatusTracker::new(config.database_path.clone())),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Server listening on {}", config.listen_addr());
    axum::serve(listener, app).await?;

    Ok(())
}
