use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use vidvault_core::models::{CreateVideoRequest, VideoAsset};
use vidvault_core::AppError;
use vidvault_storage::Storage;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 255;

/// Load a record and make sure the caller owns it.
async fn owned_video(state: &AppState, id: Uuid, user: AuthUser) -> Result<VideoAsset, AppError> {
    let video = state
        .repository
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    if !video.is_owned_by(user.user_id) {
        return Err(AppError::Forbidden("You do not own this video".to_string()));
    }
    Ok(video)
}

/// Recover the storage key behind a public URL issued by the same backend.
fn stored_key_for_url(storage: &dyn Storage, url: &str) -> Option<String> {
    let base = storage.public_url("");
    url.strip_prefix(base.as_str())
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = VideoAsset),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.user_id, operation = "create_video"))]
pub async fn create_video(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        ))
        .into());
    }

    let video = VideoAsset::new(user.user_id, title.to_string(), request.description);
    state.repository.create_video(&video).await?;

    tracing::info!(video_id = %video.id, "Video record created");
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's videos, newest first", body = [VideoAsset]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.repository.list_videos_for_user(user.user_id).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoAsset),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, video_id = %video_id, operation = "get_video"))]
pub async fn get_video(
    user: AuthUser,
    Path(video_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = owned_video(&state, video_id, user).await?;
    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, video_id = %video_id, operation = "delete_video"))]
pub async fn delete_video(
    user: AuthUser,
    Path(video_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = owned_video(&state, video_id, user).await?;
    state.repository.delete_video(video_id).await?;

    // Objects are removed after the record; a failure here only leaves an orphan.
    let thumbnail_key = video
        .thumbnail_url
        .as_deref()
        .and_then(|url| stored_key_for_url(state.storage.as_ref(), url));
    for key in video.storage_key.into_iter().chain(thumbnail_key) {
        if let Err(e) = state.storage.delete(&key).await {
            tracing::warn!(
                video_id = %video_id,
                storage_key = %key,
                error = %e,
                "Failed to delete stored object for removed video"
            );
        }
    }

    tracing::info!("Video deleted");
    Ok(StatusCode::NO_CONTENT)
}
