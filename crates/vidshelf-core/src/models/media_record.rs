use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A catalog entry for one uploaded video.
///
/// Records become visible only after both the storage upload and the catalog
/// write succeeded. Counters only ever grow and comments are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: Uuid,
    pub title: String,
    /// Permanent retrieval URL of the video object
    pub media_url: String,
    /// Preview image URL; empty when no thumbnail was stored
    pub thumbnail_url: String,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Storage key of the video object, kept for out-of-band reconciliation
    #[serde(skip)]
    pub media_storage_id: Option<String>,
    #[serde(skip)]
    pub thumbnail_storage_id: Option<String>,
}

/// Fields known at ingestion time; the store assigns id, counters and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaRecord {
    pub title: String,
    pub media_url: String,
    pub media_storage_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_storage_id: Option<String>,
}

/// Database row for the media_records table.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct MediaRecordRow {
    pub id: Uuid,
    pub title: String,
    pub media_url: String,
    pub media_storage_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_storage_id: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MediaRecordRow> for MediaRecord {
    fn from(row: MediaRecordRow) -> Self {
        MediaRecord {
            id: row.id,
            title: row.title,
            media_url: row.media_url,
            thumbnail_url: row.thumbnail_url.unwrap_or_default(),
            views: row.views,
            likes: row.likes,
            dislikes: row.dislikes,
            comments: row.comments,
            created_at: row.created_at,
            media_storage_id: row.media_storage_id,
            thumbnail_storage_id: row.thumbnail_storage_id,
        }
    }
}

/// Interaction counters that can be incremented on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Views,
    Likes,
    Dislikes,
}

impl CounterField {
    /// Column name in media_records.
    pub fn column(&self) -> &'static str {
        match self {
            CounterField::Views => "views",
            CounterField::Likes => "likes",
            CounterField::Dislikes => "dislikes",
        }
    }
}

/// One page of records plus the total number of records in the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub records: Vec<MediaRecord>,
    pub total: i64,
}

impl CatalogPage {
    /// Whether records remain beyond `skip + records.len()`.
    pub fn has_more(&self, skip: i64) -> bool {
        skip + (self.records.len() as i64) < self.total
    }
}

/// Minimal projection used for sitemap enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct CatalogEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> MediaRecordRow {
        MediaRecordRow {
            id: Uuid::new_v4(),
            title: "Sunset".to_string(),
            media_url: "https://cdn.example.com/videos/a.mp4".to_string(),
            media_storage_id: Some("videos/a.mp4".to_string()),
            thumbnail_url: None,
            thumbnail_storage_id: None,
            views: 3,
            likes: 1,
            dislikes: 0,
            comments: vec!["first".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_serializes_camel_case_without_storage_ids() {
        let record = MediaRecord::from(sample_row());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mediaUrl"], "https://cdn.example.com/videos/a.mp4");
        assert_eq!(json["thumbnailUrl"], "");
        assert_eq!(json["views"], 3);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("mediaStorageId").is_none());
        assert!(json.get("media_storage_id").is_none());
    }

    #[test]
    fn test_has_more() {
        let page = CatalogPage {
            records: vec![MediaRecord::from(sample_row()); 12],
            total: 25,
        };
        assert!(page.has_more(0));
        assert!(page.has_more(12));

        let last = CatalogPage {
            records: vec![MediaRecord::from(sample_row())],
            total: 25,
        };
        assert!(!last.has_more(24));
        assert!(!CatalogPage::default().has_more(0));
    }

    #[test]
    fn test_counter_columns() {
        assert_eq!(CounterField::Views.column(), "views");
        assert_eq!(CounterField::Likes.column(), "likes");
        assert_eq!(CounterField::Dislikes.column(), "dislikes");
    }
}
