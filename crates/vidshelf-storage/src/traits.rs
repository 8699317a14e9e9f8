//! Storage abstraction trait
//!
//! Every object storage backend (S3, local filesystem) implements [`Storage`].
//! Backends only move bytes; size ceilings, content-type checks, key layout and
//! timeouts are enforced one level up by [`crate::StorageClient`].

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use vidshelf_core::ResourceKind;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Payload too large: {size} bytes exceeds max {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Payload is empty")]
    EmptyPayload,

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Transient failures may succeed when the same call is repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Network(_) | StorageError::Timeout(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Keys are produced by the client as `{folder}/{uuid}.{ext}`; backends must
/// reject keys containing `..` or a leading `/`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data under `storage_key` and return its public URL.
    ///
    /// `kind` lets the backend choose an upload strategy (e.g. multipart for
    /// large videos).
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        kind: ResourceKind,
    ) -> StorageResult<String>;

    /// Delete the object stored under `storage_key`
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check whether an object exists under `storage_key`
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Storage key behind a URL this backend returned from `upload_with_key`,
    /// or `None` when the URL does not point into this backend.
    fn key_for_url(&self, url: &str) -> Option<String>;

    /// Which backend this is
    fn backend_type(&self) -> StorageBackend;
}
