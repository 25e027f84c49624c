use bytes::{Bytes, BytesMut};
use chrono::Utc;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use vidvault_core::models::VideoAsset;
use vidvault_db::VideoRepository;
use vidvault_storage::{keys, Storage};

use super::{authorize, UploadRequest};
use crate::error::IngestError;
use crate::validator::MediaValidator;

/// Thumbnail upload: small images buffered in memory and stored under a random key.
#[derive(Clone)]
pub struct ThumbnailIngest {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
    validator: MediaValidator,
}

/// File extension for an image media type: `image/jpeg` → `jpeg`.
fn extension_for(media_type: &str) -> &str {
    media_type
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .unwrap_or(media_type)
}

impl ThumbnailIngest {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
        validator: MediaValidator,
    ) -> Self {
        Self {
            storage,
            repository,
            validator,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.validator.max_file_size()
    }

    pub async fn ingest<S>(&self, request: UploadRequest<S>) -> Result<VideoAsset, IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let UploadRequest {
            video_id,
            user_id,
            media_type,
            body,
        } = request;

        let mut video = authorize(self.repository.as_ref(), video_id, user_id).await?;
        let media_type = self.validator.validate_content_type(media_type.as_deref())?;

        let mut body = std::pin::pin!(body);
        let mut data = BytesMut::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            self.validator.validate_file_size(data.len() + chunk.len())?;
            data.extend_from_slice(&chunk);
        }
        self.validator.validate_not_empty(data.len())?;

        let storage_key = keys::thumbnail_key(extension_for(&media_type));
        let size_bytes = data.len();
        let url = self
            .storage
            .upload(&storage_key, &media_type, data.freeze())
            .await?;

        video.thumbnail_url = Some(url);
        video.updated_at = Utc::now();
        self.repository
            .update_video(&video)
            .await
            .map_err(IngestError::Metadata)?;

        tracing::info!(
            video_id = %video_id,
            storage_key = %storage_key,
            content_type = %media_type,
            size_bytes = size_bytes,
            "Thumbnail stored"
        );

        Ok(video)
    }
}
