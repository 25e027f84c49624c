//! Application state shared by all handlers.

use axum::extract::FromRef;
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_db::VideoRepository;
use vidvault_processing::{ThumbnailIngest, VideoIngestPipeline};
use vidvault_storage::Storage;

use crate::auth::JwtValidator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub video_ingest: VideoIngestPipeline,
    pub thumbnail_ingest: ThumbnailIngest,
    pub jwt: JwtValidator,
}

impl FromRef<Arc<AppState>> for JwtValidator {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.jwt.clone()
    }
}
