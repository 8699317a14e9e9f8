//! Catalog store abstraction
//!
//! The catalog holds one [`MediaRecord`] per ingested video. Mutations are
//! single-record atomic operations and never create records: incrementing or
//! commenting on an unknown id reports `false` instead.

mod memory;
mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::{is_connection_error, PgCatalogStore};

use async_trait::async_trait;
use uuid::Uuid;
use vidshelf_core::models::{CatalogEntry, CatalogPage, CounterField, MediaRecord, NewMediaRecord};
use vidshelf_core::{AppError, ReadinessGate};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist a new record; the store assigns id, counters and `createdAt`.
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError>;

    /// Records ordered by `createdAt` descending, skipping `skip`; `limit: None` returns the rest.
    async fn list(&self, skip: i64, limit: Option<i64>) -> Result<CatalogPage, AppError>;

    /// Id and creation time of every record, newest first.
    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError>;

    /// Add exactly 1 to `field`; `false` when no record has this id.
    async fn increment(&self, id: Uuid, field: CounterField) -> Result<bool, AppError>;

    /// Append `text` to the end of the comment list; `false` when no record has this id.
    async fn append_comment(&self, id: Uuid, text: &str) -> Result<bool, AppError>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), AppError>;

    /// Gate tracking this store's connection state.
    fn readiness(&self) -> ReadinessGate;
}
