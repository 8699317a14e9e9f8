//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::constants::{MEDIA_MOUNT, MULTIPART_OVERHEAD_BYTES};
use crate::middleware::{request_id_middleware, RequestSpan};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use vidshelf_core::{Config, StorageBackend};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    let request_timeout_secs = config.request_timeout_secs().max(1);
    let body_limit = config
        .max_video_size_bytes()
        .max(config.max_thumbnail_size_bytes())
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs,
        body_limit_mb = body_limit / 1024 / 1024,
        "HTTP limits enabled"
    );

    let mut app = public_routes()
        .merge(domains::ingestion_routes())
        .merge(domains::video_routes())
        .merge(domains::interaction_routes())
        .merge(domains::seo_routes())
        .with_state(state)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        );

    if config.storage_backend() == StorageBackend::Local {
        if let Some(root) = config.local_storage_path() {
            tracing::info!(root, mount = MEDIA_MOUNT, "Serving local media files");
            app = app.nest_service(MEDIA_MOUNT, ServeDir::new(root));
        }
    }

    let app = app
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
