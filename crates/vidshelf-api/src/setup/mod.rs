//! Application setup and initialization
//!
//! Everything `main` needs to go from a [`Config`] to a running router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidshelf_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production());

    tracing::info!(
        environment = %config.environment(),
        catalog_backend = %config.catalog_backend(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let catalog = database::setup_catalog(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), catalog, storage));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
