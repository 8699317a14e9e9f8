//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs over the in-memory catalog and in-memory storage, so these tests
//! need neither Docker nor network access.

#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use vidshelf_api::constants::{self, ADMIN_PASSWORD_HEADER};
use vidshelf_api::services::IngestSettings;
use vidshelf_api::setup::routes;
use vidshelf_api::state::AppState;
use vidshelf_core::models::{MediaRecord, NewMediaRecord};
use vidshelf_core::{BackendState, CatalogServiceConfig, Config};
use vidshelf_db::test_helpers::FlakyCatalogStore;
use vidshelf_db::CatalogStore;
use vidshelf_storage::test_helpers::MemoryStorage;
use vidshelf_storage::{StorageClient, StorageLimits};

pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the backends behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: MemoryStorage,
    pub catalog: FlakyCatalogStore,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Flip the catalog gate without touching the stored records.
    pub fn set_catalog_state(&self, state: BackendState) {
        self.catalog.inner().reporter().report(state);
    }

    /// Insert records directly into the catalog, oldest first.
    pub async fn seed(&self, count: usize) -> Vec<MediaRecord> {
        let mut records = Vec::with_capacity(count);
        for i in 0..count {
            let record = self
                .catalog
                .inner()
                .create(NewMediaRecord {
                    title: format!("Seeded {i}"),
                    media_url: format!("https://storage.test/videos/seeded-{i}.mp4"),
                    media_storage_id: Some(format!("videos/seeded-{i}.mp4")),
                    thumbnail_url: None,
                    thumbnail_storage_id: None,
                })
                .await
                .unwrap();
            records.push(record);
        }
        records
    }
}

pub fn test_config() -> Config {
    Config(Box::new(CatalogServiceConfig {
        admin_password: ADMIN_PASSWORD.to_string(),
        public_base_url: "https://video.example.com".to_string(),
        max_video_size_bytes: 1024 * 1024,
        max_thumbnail_size_bytes: 64 * 1024,
        max_comment_length: 200,
        local_storage_path: None,
        ..Default::default()
    }))
}

/// Setup test app with an in-memory catalog and storage.
pub async fn setup_test_app() -> TestApp {
    let config = test_config();
    let storage = MemoryStorage::new();
    let catalog = FlakyCatalogStore::new();

    let client = StorageClient::new(
        Arc::new(storage.clone()),
        StorageLimits {
            max_video_bytes: config.max_video_size_bytes(),
            max_image_bytes: config.max_thumbnail_size_bytes(),
        },
        Duration::from_secs(5),
    );

    let settings = IngestSettings {
        retry_backoff: Duration::from_millis(1),
        ..IngestSettings::from_config(&config)
    };
    let state = Arc::new(
        AppState::new(config.clone(), Arc::new(catalog.clone()), client)
            .with_ingest_settings(settings),
    );

    let router = routes::setup_routes(&config, state).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        storage,
        catalog,
    }
}

pub fn admin_header() -> (&'static str, &'static str) {
    (ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD)
}

/// A few bytes labelled as MP4; storage only checks the declared type.
pub fn fake_mp4() -> Vec<u8> {
    vec![0x00, 0x00, 0x00, 0x18, 0x66, 0x74, 0x79, 0x70, 0x6d, 0x70, 0x34, 0x32]
}

/// Minimal valid 1x1 PNG bytes.
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// The same 1x1 PNG as a base64 data URI.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVQI12P4AAAAAQABABjdjYkAAAAASUVORK5CYII=";
