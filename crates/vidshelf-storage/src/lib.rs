//! Vidshelf Storage Library
//!
//! Object storage abstraction for the catalog service: the [`Storage`] trait, the
//! S3 and local filesystem backends, and the [`StorageClient`] that enforces
//! upload rules on top of them.
//!
//! # Storage key format
//!
//! Keys are `{folder}/{uuid}.{ext}`, where the folder is the configured video or
//! thumbnail namespace. Keys must not contain `..` or a leading `/`.

pub mod client;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use client::{Payload, StorageClient, StorageLimits, StoredObject};
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vidshelf_core::{ResourceKind, StorageBackend};
