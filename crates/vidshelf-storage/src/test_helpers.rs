//! In-memory storage backend for testing
//!
//! Records every upload attempt and deletion, and can be told to fail uploads
//! or deletions so ingestion failure paths can be exercised without a bucket.

use crate::keys::key_under_base;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vidshelf_core::ResourceKind;

const PUBLIC_BASE: &str = "https://storage.test";

/// Failure to inject into the next upload of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Network,
    Timeout,
    Rejected,
}

impl InjectedFailure {
    fn into_error(self) -> StorageError {
        match self {
            InjectedFailure::Network => StorageError::Network("connection reset".to_string()),
            InjectedFailure::Timeout => StorageError::Timeout(Duration::from_secs(1)),
            InjectedFailure::Rejected => StorageError::Rejected("bucket policy".to_string()),
        }
    }
}

#[derive(Default)]
struct Recorded {
    objects: HashMap<String, (Bytes, String)>,
    attempts: HashMap<ResourceKind, usize>,
    queued_failures: HashMap<ResourceKind, VecDeque<InjectedFailure>>,
    always_fail: HashMap<ResourceKind, InjectedFailure>,
    deleted: Vec<String>,
    fail_deletes: bool,
}

/// Mock storage backend for testing without S3 or disk
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Recorded>>,
    upload_delay: Option<Duration>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every upload.
    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    /// Fail the next uploads of `kind`, one queued failure per attempt.
    pub fn fail_uploads(&self, kind: ResourceKind, failures: Vec<InjectedFailure>) {
        self.inner
            .lock()
            .unwrap()
            .queued_failures
            .entry(kind)
            .or_default()
            .extend(failures);
    }

    /// Fail every upload of `kind`.
    pub fn fail_all_uploads(&self, kind: ResourceKind, failure: InjectedFailure) {
        self.inner.lock().unwrap().always_fail.insert(kind, failure);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_deletes = fail;
    }

    pub fn upload_attempts(&self, kind: ResourceKind) -> usize {
        self.inner
            .lock()
            .unwrap()
            .attempts
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, storage_key: &str) -> bool {
        self.inner.lock().unwrap().objects.contains_key(storage_key)
    }

    pub fn stored_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.lock().unwrap().objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Every key passed to `delete`, in call order, including failed calls.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.inner.lock().unwrap().deleted.clone()
    }

    pub fn content_type_of(&self, storage_key: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .objects
            .get(storage_key)
            .map(|(_, content_type)| content_type.clone())
    }

    pub fn public_url(storage_key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, storage_key)
    }

    /// Place an object directly, as a client uploading out of band would.
    pub fn put_object(&self, storage_key: &str, content_type: &str) {
        self.inner.lock().unwrap().objects.insert(
            storage_key.to_string(),
            (Bytes::from_static(b"object"), content_type.to_string()),
        );
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
        kind: ResourceKind,
    ) -> StorageResult<String> {
        let failure = {
            let mut inner = self.inner.lock().unwrap();
            *inner.attempts.entry(kind).or_default() += 1;
            let queued = inner
                .queued_failures
                .get_mut(&kind)
                .and_then(|queue| queue.pop_front());
            queued.or_else(|| inner.always_fail.get(&kind).copied())
        };

        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = failure {
            return Err(failure.into_error());
        }

        self.inner
            .lock()
            .unwrap()
            .objects
            .insert(storage_key.to_string(), (data, content_type.to_string()));
        Ok(Self::public_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.deleted.push(storage_key.to_string());
        if inner.fail_deletes {
            return Err(StorageError::DeleteFailed("injected delete failure".to_string()));
        }
        inner.objects.remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.contains(storage_key))
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        key_under_base(PUBLIC_BASE, url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
