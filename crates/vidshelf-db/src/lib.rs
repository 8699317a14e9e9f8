//! Vidshelf catalog persistence
//!
//! The [`CatalogStore`] trait with PostgreSQL and in-memory implementations,
//! plus the [`ConnectionMonitor`] that keeps the readiness gate current.

pub mod catalog;
pub mod monitor;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use catalog::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
pub use monitor::ConnectionMonitor;

use sqlx::PgPool;

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
