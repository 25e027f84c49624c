use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use vidvault_core::models::VideoAsset;
use vidvault_core::AppError;

use super::repository::VideoRepository;

/// Process-local video repository.
///
/// Used when no `DATABASE_URL` is configured and by tests. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoAsset>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.videos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.videos.read().await.is_empty()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, video: &VideoAsset) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::InvalidInput(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoAsset>, AppError> {
        let mut owned: Vec<VideoAsset> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_video(&self, video: &VideoAsset) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), AppError> {
        match self.videos.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Video {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidvault_core::models::AspectLabel;

    #[tokio::test]
    async fn create_then_get() {
        let repo = InMemoryVideoRepository::new();
        let video = VideoAsset::new(Uuid::new_v4(), "Intro".to_string(), None);

        repo.create_video(&video).await.unwrap();

        let fetched = repo.get_video(video.id).await.unwrap();
        assert_eq!(fetched, Some(video));
        assert!(repo.get_video(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_create_rejected() {
        let repo = InMemoryVideoRepository::new();
        let video = VideoAsset::new(Uuid::new_v4(), "Intro".to_string(), None);
        repo.create_video(&video).await.unwrap();
        assert!(repo.create_video(&video).await.is_err());
    }

    #[tokio::test]
    async fn update_replaces_record() {
        let repo = InMemoryVideoRepository::new();
        let mut video = VideoAsset::new(Uuid::new_v4(), "Intro".to_string(), None);
        repo.create_video(&video).await.unwrap();

        video.video_url = Some("https://b.s3.r.amazonaws.com/landscape/k.mp4".to_string());
        video.aspect_label = Some(AspectLabel::Landscape16x9);
        repo.update_video(&video).await.unwrap();

        let fetched = repo.get_video(video.id).await.unwrap().unwrap();
        assert_eq!(fetched.aspect_label, Some(AspectLabel::Landscape16x9));
        assert!(fetched.video_url.is_some());
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let repo = InMemoryVideoRepository::new();
        let video = VideoAsset::new(Uuid::new_v4(), "Ghost".to_string(), None);
        let err = repo.update_video(&video).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_owner() {
        let repo = InMemoryVideoRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        repo.create_video(&VideoAsset::new(alice, "a1".into(), None))
            .await
            .unwrap();
        repo.create_video(&VideoAsset::new(alice, "a2".into(), None))
            .await
            .unwrap();
        repo.create_video(&VideoAsset::new(bob, "b1".into(), None))
            .await
            .unwrap();

        let listed = repo.list_videos_for_user(alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|v| v.user_id == alice));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let repo = InMemoryVideoRepository::new();
        let video = VideoAsset::new(Uuid::new_v4(), "Intro".to_string(), None);
        repo.create_video(&video).await.unwrap();

        repo.delete_video(video.id).await.unwrap();
        assert!(repo.is_empty().await);
        assert!(matches!(
            repo.delete_video(video.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
