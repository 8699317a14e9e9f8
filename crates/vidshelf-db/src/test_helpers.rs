//! Failure-injecting catalog for exercising ingestion rollback

use crate::catalog::{CatalogStore, MemoryCatalogStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;
use vidshelf_core::models::{CatalogEntry, CatalogPage, CounterField, MediaRecord, NewMediaRecord};
use vidshelf_core::{AppError, ReadinessGate};

/// Memory catalog whose `create` can be told to fail, and which counts every
/// call that reached it.
#[derive(Clone, Default)]
pub struct FlakyCatalogStore {
    inner: MemoryCatalogStore,
    fail_creates: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FlakyCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryCatalogStore {
        &self.inner
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Number of trait calls that reached this store, of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for FlakyCatalogStore {
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        self.record_call();
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected catalog write failure".to_string()));
        }
        self.inner.create(record).await
    }

    async fn list(&self, skip: i64, limit: Option<i64>) -> Result<CatalogPage, AppError> {
        self.record_call();
        self.inner.list(skip, limit).await
    }

    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, AppError> {
        self.record_call();
        self.inner.list_entries().await
    }

    async fn find(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        self.record_call();
        self.inner.find(id).await
    }

    async fn increment(&self, id: Uuid, field: CounterField) -> Result<bool, AppError> {
        self.record_call();
        self.inner.increment(id, field).await
    }

    async fn append_comment(&self, id: Uuid, text: &str) -> Result<bool, AppError> {
        self.record_call();
        self.inner.append_comment(id, text).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }

    fn readiness(&self) -> ReadinessGate {
        self.inner.readiness()
    }
}
