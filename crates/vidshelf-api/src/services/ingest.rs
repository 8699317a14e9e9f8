//! Ingestion orchestrator
//!
//! Turns an upload request into a catalog record as a two-step saga: the video
//! object is stored first, then the record is written. If the record write fails
//! the stored objects are deleted again by [`IngestService::compensate_orphans`].
//! Storage always precedes the catalog write, so a record never points at an
//! object that was not stored.

use crate::auth::AdminCredential;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use vidshelf_core::models::{MediaRecord, NewMediaRecord};
use vidshelf_core::{AppError, Config, ReadinessGate, ResourceKind};
use vidshelf_db::CatalogStore;
use vidshelf_storage::{Payload, StorageClient, StorageError, StoredObject};

const RETRY_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Where the video bytes come from.
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Bytes received in the request
    Upload(Payload),
    /// Object the client already put in storage, referenced by its URL
    Remote { url: String },
}

/// Everything an ingestion request carries, before any validation.
#[derive(Debug, Clone, Default)]
pub struct PendingUpload {
    pub title: Option<String>,
    pub video: Option<VideoSource>,
    pub thumbnail: Option<Payload>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub video_folder: String,
    pub thumbnail_folder: String,
    pub default_title: String,
    /// Extra attempts after a transient video upload failure
    pub upload_retries: u32,
    /// Delay before retry `n` is `retry_backoff * n`
    pub retry_backoff: Duration,
}

impl IngestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            video_folder: config.video_folder().to_string(),
            thumbnail_folder: config.thumbnail_folder().to_string(),
            default_title: config.default_title().to_string(),
            upload_retries: config.storage_upload_retries(),
            retry_backoff: RETRY_BACKOFF_BASE,
        }
    }
}

#[derive(Clone)]
pub struct IngestService {
    gate: ReadinessGate,
    catalog: Arc<dyn CatalogStore>,
    storage: StorageClient,
    credential: AdminCredential,
    settings: IngestSettings,
}

impl IngestService {
    pub fn new(
        gate: ReadinessGate,
        catalog: Arc<dyn CatalogStore>,
        storage: StorageClient,
        credential: AdminCredential,
        settings: IngestSettings,
    ) -> Self {
        Self {
            gate,
            catalog,
            storage,
            credential,
            settings,
        }
    }

    /// Gate and credential checks, callable before the request body is read.
    pub fn admit(&self, credential: Option<&str>) -> Result<(), AppError> {
        self.gate.ensure_ready()?;
        self.credential.verify(credential)
    }

    /// Validate, store and persist one upload.
    #[tracing::instrument(skip(self, upload), fields(has_thumbnail = upload.thumbnail.is_some()))]
    pub async fn ingest(&self, upload: PendingUpload) -> Result<MediaRecord, AppError> {
        // Rejections below happen before any storage call
        self.admit(upload.credential.as_deref())?;

        let video = upload
            .video
            .ok_or_else(|| AppError::InvalidInput("No video provided".to_string()))?;
        match &video {
            VideoSource::Upload(payload) => self
                .storage
                .check(payload, ResourceKind::Video)
                .map_err(invalid_payload)?,
            VideoSource::Remote { url } => validate_remote_url(url)?,
        }
        let title = normalize_title(upload.title.as_deref(), &self.settings.default_title);

        let mut uploaded: Vec<StoredObject> = Vec::new();
        let (media_url, media_storage_id) = match video {
            VideoSource::Upload(payload) => {
                let stored = self.upload_video(&payload).await?;
                uploaded.push(stored.clone());
                (stored.url, Some(stored.storage_id))
            }
            VideoSource::Remote { url } => {
                let storage_key = self.locate_remote(&url).await?;
                (url, Some(storage_key))
            }
        };

        let thumbnail = match upload.thumbnail {
            Some(payload) => self.upload_thumbnail(&payload).await,
            None => None,
        };
        if let Some(ref stored) = thumbnail {
            uploaded.push(stored.clone());
        }

        let new_record = NewMediaRecord {
            title,
            media_url,
            media_storage_id,
            thumbnail_url: thumbnail.as_ref().map(|t| t.url.clone()),
            thumbnail_storage_id: thumbnail.map(|t| t.storage_id),
        };

        match self.catalog.create(new_record).await {
            Ok(record) => {
                tracing::info!(
                    media_id = %record.id,
                    media_url = %record.media_url,
                    "Video ingested"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::error!(error = %e, objects = uploaded.len(), "Catalog write failed after upload");
                let orphan_removed = self.compensate_orphans(&uploaded).await;
                Err(AppError::CatalogWriteFailed {
                    message: e.to_string(),
                    orphan_removed,
                })
            }
        }
    }

    /// Upload the video, retrying transient failures with linear backoff.
    async fn upload_video(&self, payload: &Payload) -> Result<StoredObject, AppError> {
        let mut attempt: u32 = 0;
        loop {
            let result = self
                .storage
                .store(payload, ResourceKind::Video, &self.settings.video_folder)
                .await;

            match result {
                Ok(stored) => return Ok(stored),
                Err(e) if e.is_transient() && attempt < self.settings.upload_retries => {
                    attempt += 1;
                    let delay = self.settings.retry_backoff * attempt;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_retries = self.settings.upload_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Transient storage failure, retrying video upload"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempts = attempt + 1, "Video upload failed");
                    return Err(AppError::StorageUploadFailed(e.to_string()));
                }
            }
        }
    }

    /// Resolve a client-supplied URL to an object already in our storage.
    async fn locate_remote(&self, url: &str) -> Result<String, AppError> {
        match self.storage.locate(url).await {
            Ok(Some(storage_key)) => Ok(storage_key),
            Ok(None) => {
                tracing::warn!(url = %url, "Video URL does not reference a stored object");
                Err(AppError::InvalidInput(
                    "Video URL does not reference an uploaded object".to_string(),
                ))
            }
            Err(e) => {
                tracing::error!(error = %e, url = %url, "Could not verify video object");
                Err(AppError::StorageUploadFailed(format!(
                    "Could not verify video object: {}",
                    e
                )))
            }
        }
    }

    /// Single best-effort thumbnail upload.
    async fn upload_thumbnail(&self, payload: &Payload) -> Option<StoredObject> {
        match self
            .storage
            .store(payload, ResourceKind::Image, &self.settings.thumbnail_folder)
            .await
        {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!(error = %e, "Thumbnail upload failed, continuing without thumbnail");
                None
            }
        }
    }

    /// Delete each stored object once. Returns whether every deletion succeeded.
    async fn compensate_orphans(&self, objects: &[StoredObject]) -> bool {
        let mut all_removed = true;
        for object in objects {
            match self.storage.remove(&object.storage_id).await {
                Ok(()) => {
                    tracing::info!(storage_id = %object.storage_id, "Orphaned object removed");
                }
                Err(e) => {
                    all_removed = false;
                    tracing::error!(
                        error = %e,
                        storage_id = %object.storage_id,
                        url = %object.url,
                        "Orphaned object left in storage, needs manual reconciliation"
                    );
                }
            }
        }
        all_removed
    }
}

fn invalid_payload(err: StorageError) -> AppError {
    AppError::InvalidInput(match err {
        StorageError::EmptyPayload => "Video file is empty".to_string(),
        StorageError::PayloadTooLarge { max, .. } => format!(
            "Video exceeds maximum allowed size of {} MB",
            max / 1024 / 1024
        ),
        other => other.to_string(),
    })
}

fn validate_remote_url(raw: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidInput("Video URL must be an absolute http(s) URL".to_string());
    if raw.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(invalid());
    }
    // the parser skips extra slashes, so "https:///x" would otherwise become host "x"
    let authority = raw.get(parsed.scheme().len()..).unwrap_or_default();
    match authority.strip_prefix("://") {
        Some(rest) if !rest.starts_with(['/', '\\']) => Ok(()),
        _ => Err(invalid()),
    }
}

fn normalize_title(title: Option<&str>, default_title: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => default_title.to_string(),
    }
}
