//! Catalog store setup

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use vidshelf_core::{readiness_channel, BackendState, CatalogBackend, Config};
use vidshelf_db::{CatalogStore, ConnectionMonitor, MemoryCatalogStore, PgCatalogStore};

/// Build the configured catalog store.
///
/// The PostgreSQL pool connects lazily: the service starts with the readiness
/// gate closed and the connection monitor opens it (after applying migrations)
/// once the database answers.
pub async fn setup_catalog(config: &Config) -> Result<Arc<dyn CatalogStore>> {
    match config.catalog_backend() {
        CatalogBackend::Memory => {
            tracing::warn!("Using the in-memory catalog, records do not survive a restart");
            Ok(Arc::new(MemoryCatalogStore::new()))
        }
        CatalogBackend::Postgres => {
            let url = config
                .database_url()
                .context("DATABASE_URL must be set when using the postgres catalog backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections())
                .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect_lazy(url)
                .context("Invalid DATABASE_URL")?;

            let (reporter, _gate) = readiness_channel(BackendState::Disconnected);
            let check_interval = Duration::from_secs(config.readiness_check_interval_secs());
            ConnectionMonitor::new(pool.clone(), reporter.clone(), check_interval).spawn();

            tracing::info!(
                max_connections = config.db_max_connections(),
                check_interval_secs = check_interval.as_secs(),
                "PostgreSQL catalog configured, waiting for first successful connection check"
            );

            Ok(Arc::new(PgCatalogStore::new(pool, reporter)))
        }
    }
}
