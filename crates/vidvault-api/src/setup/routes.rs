//! Route configuration and setup

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use vidvault_core::Config;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use crate::utils::upload::reject_declared_oversize;

/// Build the application router with all routes and middleware.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let video_max = state.video_ingest.max_upload_size();
    let thumbnail_max = state.thumbnail_ingest.max_upload_size();
    let video_limit = video_max + MULTIPART_OVERHEAD_BYTES;
    let thumbnail_limit = thumbnail_max + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(
        max_video_mb = config.max_video_size_bytes() / 1024 / 1024,
        max_thumbnail_mb = config.max_thumbnail_size_bytes() / 1024 / 1024,
        "Upload size limits configured"
    );

    // Uploads replace axum's default 2 MB extractor limit with their own cap.
    // A declared length over the cap is answered before the body limit layer sees it.
    let api = Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route(
            "/videos",
            get(handlers::videos::list_videos).post(handlers::videos::create_video),
        )
        .route(
            "/videos/{video_id}",
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
        .route(
            "/video_upload/{video_id}",
            post(handlers::video_upload::upload_video)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(video_limit))
                .layer(middleware::from_fn(move |request: Request, next: Next| {
                    reject_declared_oversize(video_limit, video_max, request, next)
                })),
        )
        .route(
            "/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(thumbnail_limit))
                .layer(middleware::from_fn(move |request: Request, next: Next| {
                    reject_declared_oversize(thumbnail_limit, thumbnail_max, request, next)
                })),
        )
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    let app = Router::new()
        .nest(API_PREFIX, api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
