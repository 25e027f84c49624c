use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use vidvault_core::models::VideoAsset;
use vidvault_db::VideoRepository;
use vidvault_storage::{keys, Storage, UploadReader};

use super::{authorize, UploadRequest};
use crate::error::IngestError;
use crate::validator::MediaValidator;
use crate::video::{aspect, remux_output_path, MediaToolkit};

/// Drives one video upload from raw bytes to an updated metadata record.
///
/// Every temporary artifact is owned by a drop guard, so the buffered upload and
/// the remuxed copy are removed on every exit path, including cancellation of
/// the request future.
#[derive(Clone)]
pub struct VideoIngestPipeline {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
    toolkit: Arc<dyn MediaToolkit>,
    validator: MediaValidator,
    temp_dir: PathBuf,
}

impl VideoIngestPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
        toolkit: Arc<dyn MediaToolkit>,
        validator: MediaValidator,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            repository,
            toolkit,
            validator,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.validator.max_file_size()
    }

    /// Run the full pipeline and return the committed record.
    ///
    /// Ownership and media type are checked before the first body byte is read.
    pub async fn ingest<S>(&self, request: UploadRequest<S>) -> Result<VideoAsset, IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let start = std::time::Instant::now();
        let UploadRequest {
            video_id,
            user_id,
            media_type,
            body,
        } = request;

        let mut video = authorize(self.repository.as_ref(), video_id, user_id).await?;
        let media_type = self.validator.validate_content_type(media_type.as_deref())?;

        // Step 4: buffer. The guard removes the file on every later exit.
        let (buffered, size_bytes) = self.buffer_to_temp(body).await?;

        let geometry = self.toolkit.probe(buffered.path()).await?;
        let label = aspect::classify(geometry);
        tracing::debug!(
            video_id = %video_id,
            width = geometry.width,
            height = geometry.height,
            aspect = %label,
            "Video classified"
        );

        let processed = self.remux(buffered.path()).await?;
        // The pre-remux copy is no longer needed.
        drop(buffered);

        let storage_key = keys::video_key(label);
        let file = tokio::fs::File::open(&processed).await?;
        let processed_len = file.metadata().await?.len();
        let reader: UploadReader = Box::pin(file);
        let url = self
            .storage
            .upload_stream(&storage_key, &media_type, Some(processed_len), reader)
            .await?;
        drop(processed);

        video.video_url = Some(url);
        video.storage_key = Some(storage_key.clone());
        video.aspect_label = Some(label);
        video.updated_at = Utc::now();

        if let Err(e) = self.repository.update_video(&video).await {
            // The object stays in storage; nothing reconciles it automatically.
            tracing::error!(
                video_id = %video_id,
                storage_key = %storage_key,
                error = %e,
                "Metadata commit failed after upload; stored object is orphaned"
            );
            return Err(IngestError::Metadata(e));
        }

        tracing::info!(
            video_id = %video_id,
            user_id = %user_id,
            storage_key = %storage_key,
            aspect = %label,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video ingested"
        );

        Ok(video)
    }

    /// Copy the body into a fresh temp file, enforcing the size cap as bytes arrive.
    async fn buffer_to_temp<S>(&self, body: S) -> Result<(NamedTempFile, u64), IngestError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Send,
    {
        let temp = tempfile::Builder::new()
            .prefix("vidvault-upload-")
            .suffix(".mp4")
            .tempfile_in(&self.temp_dir)?;
        let mut file = tokio::fs::File::from_std(temp.reopen()?);

        let mut body = std::pin::pin!(body);
        let mut total: usize = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            total = total.saturating_add(chunk.len());
            self.validator.validate_file_size(total)?;
            file.write_all(&chunk).await?;
        }
        self.validator.validate_not_empty(total)?;

        file.flush().await?;
        file.sync_data().await?;
        file.seek(SeekFrom::Start(0)).await?;

        tracing::debug!(
            path = %temp.path().display(),
            size_bytes = total,
            "Upload buffered to temporary file"
        );

        Ok((temp, total as u64))
    }

    /// Remux `source`, returning a guard that owns the output file.
    async fn remux(&self, source: &Path) -> Result<TempPath, IngestError> {
        // Registered before ffmpeg starts so a partial output never outlives the request.
        let expected_path = remux_output_path(source);
        let expected = TempPath::try_from_path(&expected_path)?;
        let produced = self.toolkit.remux(source).await?;

        if produced == expected_path {
            Ok(expected)
        } else {
            drop(expected);
            Ok(TempPath::try_from_path(produced)?)
        }
    }
}
