//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use vidvault_core::models;

use crate::error;
use crate::handlers;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidvault API",
        version = "0.1.0",
        description = "Video ingestion service. Uploaded videos are probed, labelled by orientation (16:9, 9:16 or other), remuxed for fast start and stored in object storage."
    ),
    paths(
        handlers::health::healthz,
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::videos::delete_video,
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
    ),
    components(
        schemas(
            models::VideoAsset,
            models::AspectLabel,
            models::CreateVideoRequest,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "videos", description = "Video records"),
        (name = "uploads", description = "Video and thumbnail ingestion")
    )
)]
pub struct ApiDoc;
