//! Ingestion services and application state

use anyhow::{Context, Result};
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_db::VideoRepository;
use vidvault_processing::{
    FfmpegToolkit, MediaToolkit, MediaValidator, ThumbnailIngest, VideoIngestPipeline,
};
use vidvault_storage::Storage;

use crate::auth::JwtValidator;
use crate::state::AppState;

/// Build the production state with ffprobe/ffmpeg from the configured paths.
pub async fn initialize_services(
    config: &Config,
    repository: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let toolkit = FfmpegToolkit::new(config.ffmpeg_path(), config.ffprobe_path())?;

    tokio::fs::create_dir_all(config.upload_temp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir().display()
            )
        })?;

    tracing::info!(
        ffmpeg_path = %config.ffmpeg_path(),
        ffprobe_path = %config.ffprobe_path(),
        temp_dir = %config.upload_temp_dir().display(),
        "Media toolkit configured"
    );

    Ok(build_state(config, repository, storage, Arc::new(toolkit)))
}

/// Wire the ingestion services around the given collaborators.
pub fn build_state(
    config: &Config,
    repository: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    toolkit: Arc<dyn MediaToolkit>,
) -> Arc<AppState> {
    let video_validator = MediaValidator::new(
        config.max_video_size_bytes(),
        vec![config.video_allowed_content_type().to_string()],
    );
    let thumbnail_validator = MediaValidator::new(
        config.max_thumbnail_size_bytes(),
        config.thumbnail_allowed_content_types().to_vec(),
    );

    let video_ingest = VideoIngestPipeline::new(
        storage.clone(),
        repository.clone(),
        toolkit,
        video_validator,
        config.upload_temp_dir(),
    );
    let thumbnail_ingest =
        ThumbnailIngest::new(storage.clone(), repository.clone(), thumbnail_validator);

    Arc::new(AppState {
        config: config.clone(),
        repository,
        storage,
        video_ingest,
        thumbnail_ingest,
        jwt: JwtValidator::new(config.jwt_secret()),
    })
}
