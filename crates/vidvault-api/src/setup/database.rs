//! Metadata store setup

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use vidvault_core::Config;
use vidvault_db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};

/// Connect to Postgres and apply migrations, or fall back to the in-memory store
/// when `DATABASE_URL` is unset (rejected in production by config validation).
pub async fn setup_repository(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    let Some(database_url) = config.database_url() else {
        tracing::warn!("DATABASE_URL not set, using in-memory video repository");
        return Ok(Arc::new(InMemoryVideoRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    PgVideoRepository::migrate(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgVideoRepository::new(pool)))
}
