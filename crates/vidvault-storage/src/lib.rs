//! vidvault Storage Library
//!
//! Object storage abstraction with S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! Every stored object lives under a random, URL-safe key:
//!
//! - **Videos**: `{segment}/{random}.mp4`, where `segment` is the orientation
//!   (`landscape`, `portrait` or `other`)
//! - **Thumbnails**: `thumbnails/{random}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, UploadReader};
pub use vidvault_core::StorageBackend;
