//! Domain route groups (ingestion, videos, interactions, seo).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn ingestion_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/upload", API_PREFIX), post(handlers::upload::upload_video))
        .route(&format!("{}/save-video", API_PREFIX), post(handlers::upload::save_video))
}

pub fn video_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/videos", API_PREFIX), get(handlers::videos::list_videos))
        .route(&format!("{}/videos/{{id}}", API_PREFIX), get(handlers::videos::get_video))
}

pub fn interaction_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/view/{{id}}", API_PREFIX), post(handlers::interactions::record_view))
        .route(&format!("{}/like/{{id}}", API_PREFIX), post(handlers::interactions::record_like))
        .route(
            &format!("{}/dislike/{{id}}", API_PREFIX),
            post(handlers::interactions::record_dislike),
        )
        .route(
            &format!("{}/comment/{{id}}", API_PREFIX),
            post(handlers::interactions::add_comment),
        )
}

pub fn seo_routes() -> Router<Arc<AppState>> {
    Router::new().route("/sitemap.xml", get(handlers::sitemap::sitemap))
}
