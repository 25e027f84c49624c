use async_trait::async_trait;
use uuid::Uuid;
use vidvault_core::models::VideoAsset;
use vidvault_core::AppError;

/// Metadata store boundary for video records.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a new record.
    async fn create_video(&self, video: &VideoAsset) -> Result<(), AppError>;

    /// Fetch a record by ID, `None` if it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError>;

    /// All records owned by `user_id`, newest first.
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoAsset>, AppError>;

    /// Replace every mutable column of an existing record in one statement.
    ///
    /// Returns `NotFound` when no record with `video.id` exists.
    async fn update_video(&self, video: &VideoAsset) -> Result<(), AppError>;

    /// Delete a record. Returns `NotFound` when it does not exist.
    async fn delete_video(&self, id: Uuid) -> Result<(), AppError>;
}
