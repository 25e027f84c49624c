//! Processing error types and their mapping onto [`AppError`].

use uuid::Uuid;
use vidvault_core::AppError;
use vidvault_storage::StorageError;

use crate::validator::ValidationError;

/// Failures of the stream prober.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to execute ffprobe: {0}")]
    Execution(#[source] std::io::Error),

    #[error("ffprobe exited with status {status:?}: {stderr}")]
    NonZeroExit { status: Option<i32>, stderr: String },

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("ffprobe reported no streams")]
    NoStreamData,

    #[error("First stream has unusable geometry: {0}")]
    InvalidGeometry(String),
}

/// Failures of the fast-start remuxer.
#[derive(Debug, thiserror::Error)]
pub enum RemuxError {
    #[error("Failed to execute ffmpeg: {0}")]
    Execution(#[source] std::io::Error),

    #[error("ffmpeg exited with status {status:?}: {stderr}")]
    NonZeroExit { status: Option<i32>, stderr: String },
}

/// Terminal failure of an ingestion request.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Video {0} not found")]
    NotFound(Uuid),

    #[error("User {user_id} does not own video {video_id}")]
    Forbidden { video_id: Uuid, user_id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Upload body could not be read: {0}")]
    Body(String),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Remux(#[from] RemuxError),

    #[error("Temporary file error: {0}")]
    TempFile(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Metadata store error: {0}")]
    Metadata(#[source] AppError),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::NotFound(id) => AppError::NotFound(format!("Video {} not found", id)),
            IngestError::Forbidden { .. } => {
                AppError::Forbidden("You do not own this video".to_string())
            }
            IngestError::Validation(e) => e.into(),
            IngestError::Body(msg) => AppError::InvalidInput(msg),
            IngestError::Probe(e) => AppError::MediaTool(e.to_string()),
            IngestError::Remux(e) => AppError::MediaTool(e.to_string()),
            IngestError::TempFile(e) => AppError::Internal(format!("Temporary file error: {}", e)),
            IngestError::Storage(e) => e.into(),
            IngestError::Metadata(e) => e,
        }
    }
}
