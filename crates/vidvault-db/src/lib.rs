//! vidvault metadata store
//!
//! The [`VideoRepository`] trait is the boundary the ingestion pipeline and HTTP
//! handlers talk to. `PgVideoRepository` backs it with PostgreSQL;
//! `InMemoryVideoRepository` backs it with a map for development and tests.

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
