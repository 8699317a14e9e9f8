//! Vidshelf Core Library
//!
//! Domain models, error taxonomy, configuration, and the catalog readiness gate
//! shared by the storage, catalog, and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod readiness;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, CatalogBackend, CatalogServiceConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use readiness::{readiness_channel, BackendState, ReadinessGate, ReadinessReporter};
pub use storage_types::{ResourceKind, StorageBackend};
