use crate::error::{ErrorResponse, HttpAppError};
use crate::services::PageRequest;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use vidshelf_core::models::MediaRecord;
use vidshelf_core::AppError;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size, clamped to the configured maximum
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    params(ListQuery),
    responses(
        (status = 200, description = "Every record newest first; with page and/or limit a VideoPage object instead", body = Vec<MediaRecord>),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, HttpAppError> {
    let Query(query) = query.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid query parameters: {}",
            e.body_text()
        )))
    })?;

    let request = PageRequest {
        page: query.page,
        limit: query.limit,
    };

    if request.is_paginated() {
        Ok(Json(state.reader.list_page(request).await).into_response())
    } else {
        Ok(Json(state.reader.list_all().await).into_response())
    }
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(
        ("id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = MediaRecord),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, operation = "get_video"))]
pub async fn get_video(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.reader.get(&id).await?;
    Ok(Json(record))
}
