//! Common utilities for upload handlers

use crate::services::{PendingUpload, VideoSource};
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use vidshelf_core::AppError;
use vidshelf_storage::Payload;

/// Collect the ingestion fields from a multipart form.
///
/// Recognized fields are `title`, `video` (file), `url` (precomputed storage URL)
/// and `thumbnail` (image file or data URI). A non-empty `video` file wins over
/// `url`. Unknown fields are skipped. No size or type checks happen here.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<PendingUpload, AppError> {
    let mut upload = PendingUpload::default();
    let mut video_file: Option<Payload> = None;
    let mut remote_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "title" => upload.title = Some(read_text(field).await?),
            "video" => {
                if video_file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple video fields are not allowed; send exactly one field named 'video'"
                            .to_string(),
                    ));
                }
                video_file = Some(read_file(field).await?);
            }
            "url" => {
                let url = read_text(field).await?.trim().to_string();
                if !url.is_empty() {
                    remote_url = Some(url);
                }
            }
            "thumbnail" => {
                upload.thumbnail = if field.file_name().is_some() {
                    Some(read_file(field).await?).filter(|p| !p.is_empty())
                } else {
                    let text = read_text(field).await?;
                    thumbnail_from_text(&text)
                };
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    upload.video = match (video_file, remote_url) {
        (Some(file), Some(url)) if file.is_empty() => Some(VideoSource::Remote { url }),
        (Some(file), _) => Some(VideoSource::Upload(file)),
        (None, Some(url)) => Some(VideoSource::Remote { url }),
        (None, None) => None,
    };

    Ok(upload)
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read form field: {}", e)))
}

async fn read_file(field: Field<'_>) -> Result<Payload, AppError> {
    let filename = field.file_name().map(sanitize_filename).transpose()?;
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

    let payload = Payload::new(data, content_type);
    Ok(match filename {
        Some(name) => payload.with_filename(name),
        None => payload,
    })
}

/// Best-effort thumbnail from a text field; malformed input means no thumbnail.
pub fn thumbnail_from_text(text: &str) -> Option<Payload> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match decode_data_uri(text) {
        Ok(payload) if !payload.is_empty() => Some(payload),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed thumbnail data URI");
            None
        }
    }
}

/// Decode a base64 `data:` URI into a payload carrying its media type.
pub fn decode_data_uri(uri: &str) -> Result<Payload, AppError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::InvalidInput("Expected a data: URI".to_string()))?;
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| AppError::InvalidInput("Data URI has no payload".to_string()))?;
    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::InvalidInput("Only base64 data URIs are supported".to_string()))?;
    let content_type = media_type.split(';').next().unwrap_or("").trim();
    if content_type.is_empty() {
        return Err(AppError::InvalidInput("Data URI has no media type".to_string()));
    }

    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned)
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 in data URI: {}", e)))?;

    Ok(Payload::new(bytes, content_type.to_lowercase()))
}

/// Sanitize filename to prevent path traversal and other attacks
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}
