//! Vidshelf API Library
//!
//! HTTP handlers, ingestion and interaction services, and application setup for
//! the catalog service.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use state::AppState;
