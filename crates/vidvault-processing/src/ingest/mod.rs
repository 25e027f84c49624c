//! Upload ingestion: ownership checks, admission, buffering and the metadata commit.

mod thumbnail;
mod video;

pub use thumbnail::ThumbnailIngest;
pub use video::VideoIngestPipeline;

use bytes::Bytes;
use futures::Stream;
use uuid::Uuid;
use vidvault_core::models::VideoAsset;
use vidvault_db::VideoRepository;

use crate::error::IngestError;

/// One upload as seen by the ingestion layer.
///
/// `media_type` is the declared type of the file part itself, not the
/// multipart envelope's `Content-Type`.
pub struct UploadRequest<S> {
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub media_type: Option<String>,
    pub body: S,
}

impl<S> UploadRequest<S>
where
    S: Stream<Item = Result<Bytes, IngestError>> + Send,
{
    pub fn new(video_id: Uuid, user_id: Uuid, media_type: Option<String>, body: S) -> Self {
        Self {
            video_id,
            user_id,
            media_type,
            body,
        }
    }
}

/// Resolve the target record and verify the requester owns it.
pub(crate) async fn authorize(
    repository: &dyn VideoRepository,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<VideoAsset, IngestError> {
    let video = repository
        .get_video(video_id)
        .await
        .map_err(IngestError::Metadata)?
        .ok_or(IngestError::NotFound(video_id))?;

    if !video.is_owned_by(user_id) {
        tracing::warn!(
            video_id = %video_id,
            user_id = %user_id,
            "Upload rejected: requester does not own video"
        );
        return Err(IngestError::Forbidden { video_id, user_id });
    }

    Ok(video)
}
