use super::CatalogStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use vidshelf_core::models::{CatalogEntry, CatalogPage, CounterField, MediaRecord, NewMediaRecord};
use vidshelf_core::{
    readiness_channel, AppError, BackendState, ReadinessGate, ReadinessReporter,
};

/// In-process catalog for single-node deployments and tests.
///
/// Records are kept in insertion order behind one lock, so every mutation is
/// atomic with respect to every other. Nothing survives a restart.
#[derive(Clone)]
pub struct MemoryCatalogStore {
    records: Arc<Mutex<Vec<MediaRecord>>>,
    reporter: ReadinessReporter,
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        let (reporter, _gate) = readiness_channel(BackendState::Connected);
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            reporter,
        }
    }

    /// Reporter driving this store's gate; lets callers simulate an outage.
    pub fn reporter(&self) -> &ReadinessReporter {
        &self.reporter
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        let mut records = self.records.lock().await;

        // Keep createdAt non-decreasing so insertion order and time order agree
        let now = Utc::now();
        let created_at = records
            .last()
            .map(|last| last.created_at.max(now))
            .unwrap_or(now);

        let created = MediaRecord {
            id: Uuid::new_v4(),
            title: record.title,
            media_url: record.media_url,
            thumbnail_url: record.thumbnail_url.unwrap_or_default(),
            views: 0,
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
            created_at,
            media_storage_id: record.media_storage_id,
            thumbnail_storage_id: record.thumbnail_storage_id,
        };
        records.push(created.clone());

        tracing::info!(media_id = %created.id, "Media record created");
        Ok(created)
    }

    async fn list(&self, skip: i64, limit: Option<i64>) -> Result<CatalogPage, AppError> {
        let records = self.records.lock().await;
        let skip = usize::try_from(skip).unwrap_or(0);
        let take = match limit {
            Some(limit) => usize::try_from(limit).unwrap_or(0),
            None => usize::MAX,
        };

        Ok(CatalogPage {
            records: records.iter().rev().skip(skip).take(take).cloned().collect(),
            total: records.len() as i64,
        })
    }

    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, AppError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .rev()
            .map(|r| CatalogEntry {
                id: r.id,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn increment(&self, id: Uuid, field: CounterField) -> Result<bool, AppError> {
        let mut records = self.records.lock().await;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        let counter = match field {
            CounterField::Views => &mut record.views,
            CounterField::Likes => &mut record.likes,
            CounterField::Dislikes => &mut record.dislikes,
        };
        *counter += 1;
        Ok(true)
    }

    async fn append_comment(&self, id: Uuid, text: &str) -> Result<bool, AppError> {
        let mut records = self.records.lock().await;
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.comments.push(text.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        match self.reporter.gate().state() {
            BackendState::Connected => Ok(()),
            other => Err(AppError::BackendUnavailable(format!(
                "memory catalog is {}",
                other.as_str()
            ))),
        }
    }

    fn readiness(&self) -> ReadinessGate {
        self.reporter.gate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(title: &str) -> NewMediaRecord {
        NewMediaRecord {
            title: title.to_string(),
            media_url: format!("https://storage.test/videos/{title}.mp4"),
            media_storage_id: Some(format!("videos/{title}.mp4")),
            thumbnail_url: None,
            thumbnail_storage_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_initializes_counters() {
        let store = MemoryCatalogStore::new();
        let record = store.create(new_record("a")).await.unwrap();

        assert_eq!(record.views, 0);
        assert_eq!(record.likes, 0);
        assert_eq!(record.dislikes, 0);
        assert!(record.comments.is_empty());
        assert_eq!(record.thumbnail_url, "");
        assert_eq!(store.find(record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_window() {
        let store = MemoryCatalogStore::new();
        for i in 0..5 {
            store.create(new_record(&format!("v{i}"))).await.unwrap();
        }

        let all = store.list(0, None).await.unwrap();
        let titles: Vec<_> = all.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["v4", "v3", "v2", "v1", "v0"]);
        assert_eq!(all.total, 5);

        let page = store.list(2, Some(2)).await.unwrap();
        let titles: Vec<_> = page.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["v2", "v1"]);
        assert!(page.has_more(2));

        let past_end = store.list(10, Some(2)).await.unwrap();
        assert!(past_end.records.is_empty());
        assert_eq!(past_end.total, 5);
    }

    #[tokio::test]
    async fn test_increment_unknown_id_reports_false() {
        let store = MemoryCatalogStore::new();
        store.create(new_record("a")).await.unwrap();

        assert!(!store
            .increment(Uuid::new_v4(), CounterField::Likes)
            .await
            .unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_increment_touches_only_named_counter() {
        let store = MemoryCatalogStore::new();
        let record = store.create(new_record("a")).await.unwrap();

        assert!(store.increment(record.id, CounterField::Dislikes).await.unwrap());
        let updated = store.find(record.id).await.unwrap().unwrap();
        assert_eq!(updated.dislikes, 1);
        assert_eq!(updated.likes, 0);
        assert_eq!(updated.views, 0);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = MemoryCatalogStore::new();
        let record = store.create(new_record("a")).await.unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment(record.id, CounterField::Views).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().unwrap());
        }

        assert_eq!(store.find(record.id).await.unwrap().unwrap().views, 50);
    }

    #[tokio::test]
    async fn test_comments_append_in_order() {
        let store = MemoryCatalogStore::new();
        let record = store.create(new_record("a")).await.unwrap();

        for text in ["first", "second", "third"] {
            assert!(store.append_comment(record.id, text).await.unwrap());
        }
        assert!(!store.append_comment(Uuid::new_v4(), "lost").await.unwrap());

        let updated = store.find(record.id).await.unwrap().unwrap();
        assert_eq!(updated.comments, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_ping_follows_reported_state() {
        let store = MemoryCatalogStore::new();
        assert!(store.ping().await.is_ok());
        assert!(store.readiness().is_ready());

        store.reporter().report(BackendState::Disconnected);
        assert!(matches!(
            store.ping().await,
            Err(AppError::BackendUnavailable(_))
        ));
        assert!(!store.readiness().is_ready());
    }
}
