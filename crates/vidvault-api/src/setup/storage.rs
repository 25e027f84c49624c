//! Storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage initialized successfully"
    );
    Ok(storage)
}
