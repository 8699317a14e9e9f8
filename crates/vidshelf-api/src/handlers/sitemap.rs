use crate::services::render_sitemap;
use crate::state::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "seo",
    responses(
        (status = 200, description = "Sitemap with the site root and one entry per video", body = String, content_type = "application/xml")
    )
)]
pub async fn sitemap(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entries = state.reader.sitemap_entries().await;
    tracing::debug!(entries = entries.len(), "Rendering sitemap");
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(state.config.public_base_url(), &entries),
    )
}
