//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use vidvault_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reader handed to [`Storage::upload_stream`].
pub type UploadReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// ingestion pipeline never couples to a specific backend. Callers choose the key
/// (see [`crate::keys`]); every upload returns the object's public URL.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an in-memory object under `storage_key`, tagged with `content_type`.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Upload an object from a reader, consumed until EOF.
    ///
    /// `content_length` is a hint; backends must not trust it for correctness.
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: UploadReader,
    ) -> StorageResult<String>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL under which `storage_key` is served
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
