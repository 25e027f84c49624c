//! vidvault API library
//!
//! HTTP handlers, authentication, error rendering and application setup for the
//! video ingestion service.

mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
