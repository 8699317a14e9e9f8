//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub catalog: String,
    pub storage: String,
}

/// Liveness check - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check - reflects the catalog gate without touching the backend.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = state.catalog.gate.state();
    let ready = state.catalog.gate.is_ready();

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "catalog": catalog.as_str(),
        })),
    )
}

/// Full health check (catalog ping and storage ping).
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.catalog.store.clone();
    let catalog = run_check(TIMEOUT, async move { store.ping().await }, "unhealthy").await;
    let overall_healthy = catalog == "healthy";

    let storage = state.storage.clone();
    let storage = run_check(TIMEOUT, async move { storage.ping().await }, "degraded").await;

    let response = HealthCheckResponse {
        status: if overall_healthy { "healthy" } else { "unhealthy" }.to_string(),
        catalog,
        storage,
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
