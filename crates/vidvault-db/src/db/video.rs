use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vidvault_core::models::{AspectLabel, VideoAsset};
use vidvault_core::AppError;

use super::repository::VideoRepository;

const VIDEO_COLUMNS: &str = "id, user_id, title, description, created_at, updated_at, \
     thumbnail_url, video_url, storage_key, aspect_label";

/// PostgreSQL-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations from `migrations/`.
    pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::Database(e.into()))?;
        Ok(())
    }
}

/// Row shape of the `videos` table.
#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    thumbnail_url: Option<String>,
    video_url: Option<String>,
    storage_key: Option<String>,
    aspect_label: Option<String>,
}

impl TryFrom<VideoRow> for VideoAsset {
    type Error = AppError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let aspect_label = row
            .aspect_label
            .as_deref()
            .map(str::parse::<AspectLabel>)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Corrupt aspect_label column: {}", e)))?;

        Ok(VideoAsset {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
            storage_key: row.storage_key,
            aspect_label,
        })
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create_video(&self, video: &VideoAsset) -> Result<(), AppError> {
        // Dynamic queries avoid requiring DATABASE_URL at compile time
        sqlx::query(
            r#"
            INSERT INTO videos (
                id, user_id, title, description, created_at, updated_at,
                thumbnail_url, video_url, storage_key, aspect_label
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(&video.storage_key)
        .bind(video.aspect_label.map(|l| l.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoAsset::try_from).transpose()
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoAsset>, AppError> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
            VIDEO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VideoAsset::try_from).collect()
    }

    async fn update_video(&self, video: &VideoAsset) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                updated_at = $4,
                thumbnail_url = $5,
                video_url = $6,
                storage_key = $7,
                aspect_label = $8
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.updated_at)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(&video.storage_key)
        .bind(video.aspect_label.map(|l| l.as_str()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        Ok(())
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", id)));
        }

        tracing::debug!(video_id = %id, "Video record deleted");
        Ok(())
    }
}
