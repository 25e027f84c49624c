use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use http::header::AUTHORIZATION;
use uuid::Uuid;
use vidvault_core::AppError;

use super::jwt::JwtValidator;
use crate::error::HttpAppError;

/// Caller identity taken from a verified bearer token.
///
/// Extracted straight from request parts so it composes with `Multipart`, which
/// must be the last extractor of a handler.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Expected a Bearer token".to_string()))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtValidator: FromRef<S>,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = JwtValidator::from_ref(state).validate_token(token)?;
        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
