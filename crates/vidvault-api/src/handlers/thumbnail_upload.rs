use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use vidvault_core::constants::THUMBNAIL_FORM_FIELD;
use vidvault_core::models::VideoAsset;
use vidvault_processing::UploadRequest;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{field_stream, missing_field, multipart_error};

/// Upload a JPEG or PNG thumbnail for an existing record.
#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "uploads",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Multipart body with a `thumbnail` image part"),
    responses(
        (status = 200, description = "Thumbnail stored", body = VideoAsset),
        (status = 400, description = "Missing or malformed file part", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported media type", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, video_id = %video_id, operation = "thumbnail_upload")
)]
pub async fn upload_thumbnail(
    user: AuthUser,
    Path(video_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let max_size = state.thumbnail_ingest.max_upload_size();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some(THUMBNAIL_FORM_FIELD) {
            continue;
        }

        let media_type = field.content_type().map(str::to_string);
        let request = UploadRequest::new(
            video_id,
            user.user_id,
            media_type,
            field_stream(field, max_size),
        );
        let video = state.thumbnail_ingest.ingest(request).await?;
        return Ok(Json(video));
    }

    Err(missing_field(THUMBNAIL_FORM_FIELD).into())
}
