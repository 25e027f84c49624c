//! Multipart plumbing shared by the upload handlers.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Request;
use axum::http::{header::CONTENT_LENGTH, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use vidvault_core::AppError;
use vidvault_processing::{IngestError, ValidationError};

use crate::error::HttpAppError;

fn is_length_limit(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// Error raised while locating the file part, before any file bytes are consumed.
pub fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if is_length_limit(&err) {
        ValidationError::FileTooLarge { max: max_size }.into()
    } else {
        AppError::InvalidInput(format!("Malformed multipart body: {}", err.body_text()))
    }
}

/// Adapt a multipart part into the body stream the ingestion layer consumes.
///
/// A body-limit trip from the HTTP layer surfaces as the same size error the
/// ingestion layer raises on its own cap.
pub fn field_stream<'a>(
    field: Field<'a>,
    max_size: usize,
) -> impl Stream<Item = Result<Bytes, IngestError>> + Send + 'a {
    field.map(move |chunk| {
        chunk.map_err(|err| {
            if is_length_limit(&err) {
                IngestError::Validation(ValidationError::FileTooLarge { max: max_size })
            } else {
                IngestError::Body(format!("Failed to read upload: {}", err.body_text()))
            }
        })
    })
}

pub fn missing_field(name: &str) -> AppError {
    AppError::InvalidInput(format!("Missing '{}' field in multipart body", name))
}

/// Reject an upload whose declared `Content-Length` already exceeds `limit`.
///
/// Sits in front of `RequestBodyLimitLayer` so the early rejection carries the
/// same JSON error body as a cap hit while buffering.
pub async fn reject_declared_oversize(
    limit: usize,
    max_size: usize,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(length) = declared.filter(|length| *length > limit as u64) {
        tracing::debug!(
            content_length = length,
            limit = limit,
            "Upload rejected on declared length"
        );
        return HttpAppError::from(ValidationError::FileTooLarge { max: max_size }).into_response();
    }

    next.run(request).await
}
