//! Application state shared by all handlers.

use crate::auth::AdminCredential;
use crate::services::{
    CatalogReader, IngestService, IngestSettings, InteractionService, PageLimits,
};
use std::sync::Arc;
use vidshelf_core::{Config, ReadinessGate};
use vidshelf_db::CatalogStore;
use vidshelf_storage::StorageClient;

/// Catalog handle and the gate tracking its connection.
#[derive(Clone)]
pub struct CatalogState {
    pub store: Arc<dyn CatalogStore>,
    pub gate: ReadinessGate,
}

pub struct AppState {
    pub config: Config,
    pub catalog: CatalogState,
    pub storage: StorageClient,
    pub ingest: IngestService,
    pub interactions: InteractionService,
    pub reader: CatalogReader,
}

impl AppState {
    /// Wire every service over one catalog store and one storage client.
    pub fn new(config: Config, catalog: Arc<dyn CatalogStore>, storage: StorageClient) -> Self {
        let gate = catalog.readiness();

        let ingest = IngestService::new(
            gate.clone(),
            catalog.clone(),
            storage.clone(),
            AdminCredential::new(config.admin_password()),
            IngestSettings::from_config(&config),
        );
        let interactions =
            InteractionService::new(gate.clone(), catalog.clone(), config.max_comment_length());
        let reader = CatalogReader::new(
            gate.clone(),
            catalog.clone(),
            PageLimits {
                default_page_size: config.default_page_size(),
                max_page_size: config.max_page_size(),
            },
        );

        Self {
            config,
            catalog: CatalogState {
                store: catalog,
                gate,
            },
            storage,
            ingest,
            interactions,
            reader,
        }
    }

    /// Replace the ingestion settings derived from config.
    pub fn with_ingest_settings(mut self, settings: IngestSettings) -> Self {
        self.ingest = IngestService::new(
            self.catalog.gate.clone(),
            self.catalog.store.clone(),
            self.storage.clone(),
            AdminCredential::new(self.config.admin_password()),
            settings,
        );
        self
    }
}
