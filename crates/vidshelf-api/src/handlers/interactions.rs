use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

fn success() -> Json<SuccessResponse> {
    Json(SuccessResponse { success: true })
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

#[utoipa::path(
    post,
    path = "/api/view/{id}",
    tag = "interactions",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "View recorded", body = SuccessResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn record_view(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.interactions.record_view(&id).await?;
    Ok(success())
}

#[utoipa::path(
    post,
    path = "/api/like/{id}",
    tag = "interactions",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Like recorded", body = SuccessResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn record_like(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.interactions.record_like(&id).await?;
    Ok(success())
}

#[utoipa::path(
    post,
    path = "/api/dislike/{id}",
    tag = "interactions",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Dislike recorded", body = SuccessResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn record_dislike(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.interactions.record_dislike(&id).await?;
    Ok(success())
}

#[utoipa::path(
    post,
    path = "/api/comment/{id}",
    tag = "interactions",
    params(("id" = String, Path, description = "Video ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment appended", body = SuccessResponse),
        (status = 400, description = "Malformed id or comment", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn add_comment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CommentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.interactions.add_comment(&id, &body.text).await?;
    Ok(success())
}
