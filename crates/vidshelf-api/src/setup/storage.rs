//! Storage setup and initialization

use anyhow::Result;
use std::time::Duration;
use vidshelf_core::Config;
use vidshelf_storage::{create_storage, StorageClient, StorageLimits};

/// Create the configured backend wrapped in the upload-enforcing client.
pub async fn setup_storage(config: &Config) -> Result<StorageClient> {
    tracing::info!("Initializing storage abstraction...");
    let backend = create_storage(config).await?;
    let backend_type = backend.backend_type();

    let limits = StorageLimits {
        max_video_bytes: config.max_video_size_bytes(),
        max_image_bytes: config.max_thumbnail_size_bytes(),
    };
    let timeout = Duration::from_secs(config.storage_upload_timeout_secs());

    tracing::info!(
        backend = %backend_type,
        max_video_mb = limits.max_video_bytes / 1024 / 1024,
        max_thumbnail_mb = limits.max_image_bytes / 1024 / 1024,
        call_timeout_secs = timeout.as_secs(),
        "Storage abstraction initialized successfully"
    );

    Ok(StorageClient::new(backend, limits, timeout))
}
