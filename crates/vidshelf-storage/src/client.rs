//! Object storage client used by ingestion.
//!
//! Wraps a [`Storage`] backend with the rules every upload must follow: payloads
//! are bounded per [`ResourceKind`] and checked before any network call, the
//! content type must match the kind, keys are generated here, and each backend
//! call runs under a timeout. The client never retries; retry policy belongs to
//! the caller.

use crate::keys::{extension_for, generate_storage_key};
use crate::traits::{Storage, StorageError, StorageResult};
use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vidshelf_core::ResourceKind;

/// Upload payload as received from the client.
#[derive(Debug, Clone)]
pub struct Payload {
    pub data: Bytes,
    pub content_type: String,
    pub filename: Option<String>,
}

impl Payload {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Location of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    /// Opaque id usable with [`StorageClient::remove`]
    pub storage_id: String,
}

/// Per-kind size ceilings in bytes.
#[derive(Debug, Clone, Copy)]
pub struct StorageLimits {
    pub max_video_bytes: usize,
    pub max_image_bytes: usize,
}

impl StorageLimits {
    pub fn max_for(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Video => self.max_video_bytes,
            ResourceKind::Image => self.max_image_bytes,
        }
    }
}

#[derive(Clone)]
pub struct StorageClient {
    backend: Arc<dyn Storage>,
    limits: StorageLimits,
    call_timeout: Duration,
}

impl StorageClient {
    pub fn new(backend: Arc<dyn Storage>, limits: StorageLimits, call_timeout: Duration) -> Self {
        Self {
            backend,
            limits,
            call_timeout,
        }
    }

    pub fn backend(&self) -> &Arc<dyn Storage> {
        &self.backend
    }

    pub fn limits(&self) -> StorageLimits {
        self.limits
    }

    /// Validate a payload against the rules for `kind` without touching the backend.
    pub fn check(&self, payload: &Payload, kind: ResourceKind) -> StorageResult<()> {
        if payload.is_empty() {
            return Err(StorageError::EmptyPayload);
        }
        let max = self.limits.max_for(kind);
        if payload.len() > max {
            return Err(StorageError::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }
        if !kind.accepts(&payload.content_type) {
            return Err(StorageError::Rejected(format!(
                "content type '{}' is not a valid {} type",
                payload.content_type, kind
            )));
        }
        Ok(())
    }

    /// Upload `payload` into `folder` and return its URL and storage id.
    #[tracing::instrument(
        skip(self, payload),
        fields(kind = %kind, folder = %folder, size_bytes = payload.len())
    )]
    pub async fn store(
        &self,
        payload: &Payload,
        kind: ResourceKind,
        folder: &str,
    ) -> StorageResult<StoredObject> {
        self.check(payload, kind)?;

        let extension = extension_for(payload.filename.as_deref(), &payload.content_type);
        let storage_key = generate_storage_key(folder, &extension);
        let start = Instant::now();

        let upload = self.backend.upload_with_key(
            &storage_key,
            payload.data.clone(),
            &payload.content_type,
            kind,
        );
        let url = match tokio::time::timeout(self.call_timeout, upload).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    storage_key = %storage_key,
                    timeout_secs = self.call_timeout.as_secs(),
                    "Storage upload timed out"
                );
                return Err(StorageError::Timeout(self.call_timeout));
            }
        };

        tracing::debug!(
            storage_key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object stored"
        );

        Ok(StoredObject {
            url,
            storage_id: storage_key,
        })
    }

    /// Delete a previously stored object.
    pub async fn remove(&self, storage_id: &str) -> StorageResult<()> {
        match tokio::time::timeout(self.call_timeout, self.backend.delete(storage_id)).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(self.call_timeout)),
        }
    }

    /// Key of the stored object `url` points at, if it is one of ours and exists.
    pub async fn locate(&self, url: &str) -> StorageResult<Option<String>> {
        let Some(storage_key) = self.backend.key_for_url(url) else {
            return Ok(None);
        };
        match tokio::time::timeout(self.call_timeout, self.backend.exists(&storage_key)).await {
            Ok(Ok(true)) => Ok(Some(storage_key)),
            Ok(Ok(false)) => Ok(None),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(StorageError::Timeout(self.call_timeout)),
        }
    }

    /// Cheap reachability check for `/health`.
    pub async fn ping(&self) -> StorageResult<()> {
        self.backend
            .exists("health-check-non-existent-key")
            .await
            .map(drop)
    }
}
