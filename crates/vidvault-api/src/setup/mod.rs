//! Application initialization: configuration, telemetry, metadata store,
//! object storage, ingestion services and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use vidvault_core::Config;

use crate::state::AppState;

/// Initialize the application and return its state and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    config.validate()?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        port = config.server_port(),
        "Starting vidvault"
    );

    let repository = database::setup_repository(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let state = services::initialize_services(&config, repository, storage).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
