//! Read-only projections of the catalog for listing and the sitemap.
//!
//! Listing and sitemap reads degrade to empty results when the catalog is
//! unavailable or the query fails; they never error.

use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use vidshelf_core::models::{CatalogEntry, MediaRecord};
use vidshelf_core::{AppError, ReadinessGate};
use vidshelf_db::CatalogStore;

/// Requested window; `page` is 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoPage {
    pub videos: Vec<MediaRecord>,
    pub has_more: bool,
    pub page: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

#[derive(Clone)]
pub struct CatalogReader {
    gate: ReadinessGate,
    catalog: Arc<dyn CatalogStore>,
    limits: PageLimits,
}

impl CatalogReader {
    pub fn new(gate: ReadinessGate, catalog: Arc<dyn CatalogStore>, limits: PageLimits) -> Self {
        Self {
            gate,
            catalog,
            limits,
        }
    }

    /// Every record, newest first.
    pub async fn list_all(&self) -> Vec<MediaRecord> {
        if !self.gate.is_ready() {
            tracing::debug!(state = self.gate.state().as_str(), "Catalog not ready, listing nothing");
            return Vec::new();
        }
        match self.catalog.list(0, None).await {
            Ok(page) => page.records,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog listing failed, returning empty list");
                Vec::new()
            }
        }
    }

    /// One page of records, newest first.
    pub async fn list_page(&self, request: PageRequest) -> VideoPage {
        let page = request.page.unwrap_or(1).max(1);
        let limit = request
            .limit
            .unwrap_or(self.limits.default_page_size)
            .clamp(1, self.limits.max_page_size);
        let skip = (page - 1).saturating_mul(limit);

        let empty = VideoPage {
            videos: Vec::new(),
            has_more: false,
            page,
            total: 0,
        };

        if !self.gate.is_ready() {
            tracing::debug!(state = self.gate.state().as_str(), "Catalog not ready, listing nothing");
            return empty;
        }

        match self.catalog.list(skip, Some(limit)).await {
            Ok(result) => VideoPage {
                has_more: result.has_more(skip),
                total: result.total,
                videos: result.records,
                page,
            },
            Err(e) => {
                tracing::warn!(error = %e, page, limit, "Catalog page query failed, returning empty page");
                empty
            }
        }
    }

    /// Single record lookup. Unlike listings this surfaces unavailability.
    pub async fn get(&self, id: &str) -> Result<MediaRecord, AppError> {
        let uuid = Uuid::parse_str(id.trim())
            .map_err(|_| AppError::InvalidIdentifier(format!("'{}' is not a valid media id", id)))?;
        self.gate.ensure_ready()?;
        self.catalog
            .find(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", uuid)))
    }

    pub async fn sitemap_entries(&self) -> Vec<CatalogEntry> {
        if !self.gate.is_ready() {
            return Vec::new();
        }
        match self.catalog.list_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Sitemap query failed, returning empty sitemap");
                Vec::new()
            }
        }
    }
}

/// Render the sitemap: the site root, then one `/video/{id}` entry per record.
pub fn render_sitemap(base_url: &str, entries: &[CatalogEntry]) -> String {
    let base = xml_escape(base_url.trim_end_matches('/'));
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    xml.push_str(&format!("  <url>\n    <loc>{}/</loc>\n  </url>\n", base));
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}/video/{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
            base,
            entry.id,
            entry.created_at.format("%Y-%m-%d")
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vidshelf_core::models::NewMediaRecord;
    use vidshelf_core::BackendState;
    use vidshelf_db::MemoryCatalogStore;

    async fn reader_with(count: usize) -> (CatalogReader, MemoryCatalogStore) {
        let store = MemoryCatalogStore::new();
        for i in 0..count {
            store
                .create(NewMediaRecord {
                    title: format!("v{i}"),
                    media_url: format!("https://storage.test/videos/v{i}.mp4"),
                    media_storage_id: None,
                    thumbnail_url: None,
                    thumbnail_storage_id: None,
                })
                .await
                .unwrap();
        }
        let reader = CatalogReader::new(
            store.readiness(),
            Arc::new(store.clone()),
            PageLimits {
                default_page_size: 12,
                max_page_size: 100,
            },
        );
        (reader, store)
    }

    #[tokio::test]
    async fn test_pagination_over_25_records() {
        let (reader, _store) = reader_with(25).await;

        let first = reader
            .list_page(PageRequest {
                page: Some(1),
                limit: Some(12),
            })
            .await;
        assert_eq!(first.videos.len(), 12);
        assert!(first.has_more);
        assert_eq!(first.total, 25);
        assert_eq!(first.videos[0].title, "v24");

        let third = reader
            .list_page(PageRequest {
                page: Some(3),
                limit: Some(12),
            })
            .await;
        assert_eq!(third.videos.len(), 1);
        assert!(!third.has_more);
        assert_eq!(third.videos[0].title, "v0");
    }

    #[tokio::test]
    async fn test_limit_defaults_and_clamps() {
        let (reader, _store) = reader_with(150).await;

        let defaulted = reader
            .list_page(PageRequest {
                page: Some(1),
                limit: None,
            })
            .await;
        assert_eq!(defaulted.videos.len(), 12);

        let clamped = reader
            .list_page(PageRequest {
                page: None,
                limit: Some(1000),
            })
            .await;
        assert_eq!(clamped.videos.len(), 100);
        assert_eq!(clamped.page, 1);

        let zero_page = reader
            .list_page(PageRequest {
                page: Some(0),
                limit: Some(5),
            })
            .await;
        assert_eq!(zero_page.page, 1);
        assert_eq!(zero_page.videos[0].title, "v149");
    }

    #[tokio::test]
    async fn test_gate_closed_yields_empty_results() {
        let (reader, store) = reader_with(3).await;
        store.reporter().report(BackendState::Disconnected);

        assert!(reader.list_all().await.is_empty());
        let page = reader.list_page(PageRequest::default()).await;
        assert!(page.videos.is_empty());
        assert!(!page.has_more);
        assert!(reader.sitemap_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_single_record() {
        let (reader, store) = reader_with(1).await;
        let record = store.list(0, None).await.unwrap().records.remove(0);

        assert_eq!(reader.get(&record.id.to_string()).await.unwrap(), record);
        assert!(matches!(
            reader.get(&Uuid::new_v4().to_string()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            reader.get("nope").await,
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_render_sitemap() {
        let id = Uuid::parse_str("6f1c8fbb-5d8f-4f39-9d6a-0b8d7c2f6a11").unwrap();
        let entries = vec![CatalogEntry {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap(),
        }];

        let xml = render_sitemap("https://video.example.com/", &entries);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://video.example.com/</loc>"));
        assert!(xml.contains(
            "<loc>https://video.example.com/video/6f1c8fbb-5d8f-4f39-9d6a-0b8d7c2f6a11</loc>"
        ));
        assert!(xml.contains("<lastmod>2024-03-09</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 2);
    }

    #[test]
    fn test_sitemap_escapes_base_url() {
        let xml = render_sitemap("https://example.com/?a=1&b=2", &[]);
        assert!(xml.contains("?a=1&amp;b=2"));
    }
}
