use crate::constants::ADMIN_PASSWORD_HEADER;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::{PendingUpload, VideoSource};
use crate::state::AppState;
use crate::utils::upload::{extract_upload_form, thumbnail_from_text};
use axum::{
    extract::{multipart::MultipartRejection, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use vidshelf_core::models::MediaRecord;
use vidshelf_core::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub id: Uuid,
    pub video: MediaRecord,
}

/// JSON body for registering an object the client already uploaded.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveVideoRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// Public URL of a video already in this service's storage
    #[serde(default)]
    pub url: Option<String>,
    /// Thumbnail as a base64 data URI
    #[serde(default)]
    pub thumbnail: Option<String>,
}

fn admin_credential(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn multipart_error(rejection: MultipartRejection) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!(
        "Expected a multipart/form-data body: {}",
        rejection.body_text()
    )))
}

fn created(record: MediaRecord) -> impl IntoResponse {
    Json(UploadResponse {
        success: true,
        id: record.id,
        video: record,
    })
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "ingestion",
    params(
        ("x-admin-password" = String, Header, description = "Admin credential")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded and recorded", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid admin credential", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse),
        (status = 500, description = "Storage or catalog failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let credential = admin_credential(&headers);
    state.ingest.admit(credential.as_deref())?;

    let multipart = multipart.map_err(multipart_error)?;
    let mut upload = extract_upload_form(multipart).await?;
    upload.credential = credential;

    let record = state.ingest.ingest(upload).await?;
    Ok(created(record))
}

#[utoipa::path(
    post,
    path = "/api/save-video",
    tag = "ingestion",
    params(
        ("x-admin-password" = String, Header, description = "Admin credential")
    ),
    request_body(content = SaveVideoRequest, description = "JSON body, or the same multipart form as /api/upload"),
    responses(
        (status = 200, description = "Video recorded", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid admin credential", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse),
        (status = 500, description = "Storage or catalog failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, request), fields(operation = "save_video"))]
pub async fn save_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let credential = admin_credential(&headers);
    state.ingest.admit(credential.as_deref())?;

    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    let mut upload = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(multipart_error)?;
        extract_upload_form(multipart).await?
    } else {
        let ValidatedJson(body) =
            ValidatedJson::<SaveVideoRequest>::from_request(request, &state).await?;
        PendingUpload {
            title: body.title,
            video: body
                .url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .map(|url| VideoSource::Remote { url }),
            thumbnail: body.thumbnail.as_deref().and_then(thumbnail_from_text),
            credential: None,
        }
    };
    upload.credential = credential;

    let record = state.ingest.ingest(upload).await?;
    Ok(created(record))
}
