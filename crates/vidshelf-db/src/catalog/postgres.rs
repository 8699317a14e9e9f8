use super::CatalogStore;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidshelf_core::models::{
    CatalogEntry, CatalogPage, CounterField, MediaRecord, MediaRecordRow, NewMediaRecord,
};
use vidshelf_core::{AppError, BackendState, ReadinessGate, ReadinessReporter};

/// Whether a sqlx error means the backend itself is unreachable.
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// PostgreSQL-backed catalog
///
/// Reports connection loss to the readiness gate whenever a query fails with a
/// connection-class error; the [`crate::ConnectionMonitor`] reports recovery.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
    reporter: ReadinessReporter,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool, reporter: ReadinessReporter) -> Self {
        Self { pool, reporter }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn observe<T>(&self, result: Result<T, sqlx::Error>) -> Result<T, AppError> {
        result.map_err(|e| {
            if is_connection_error(&e) {
                self.reporter.report(BackendState::Disconnected);
            }
            AppError::Database(e)
        })
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[tracing::instrument(skip(self, record), fields(db.table = "media_records", db.operation = "insert"))]
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<Postgres, MediaRecordRow>(
            r#"
            INSERT INTO media_records
                (id, title, media_url, media_storage_id, thumbnail_url, thumbnail_storage_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&record.title)
        .bind(&record.media_url)
        .bind(&record.media_storage_id)
        .bind(&record.thumbnail_url)
        .bind(&record.thumbnail_storage_id)
        .fetch_one(&self.pool)
        .await;

        let row = self.observe(row)?;
        tracing::info!(media_id = %row.id, "Media record created");
        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_records", db.operation = "select"))]
    async fn list(&self, skip: i64, limit: Option<i64>) -> Result<CatalogPage, AppError> {
        // page and total come from one snapshot
        let mut tx = self.observe(self.pool.begin().await)?;
        let snapshot = sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await;
        self.observe(snapshot)?;

        // LIMIT NULL is LIMIT ALL in PostgreSQL
        let rows = sqlx::query_as::<Postgres, MediaRecordRow>(
            "SELECT * FROM media_records ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(skip.max(0))
        .fetch_all(&mut *tx)
        .await;
        let rows = self.observe(rows)?;

        let total: Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT COUNT(*) FROM media_records")
                .fetch_one(&mut *tx)
                .await;
        let total = self.observe(total)?;
        self.observe(tx.commit().await)?;

        Ok(CatalogPage {
            records: rows.into_iter().map(MediaRecord::from).collect(),
            total,
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_records", db.operation = "select"))]
    async fn list_entries(&self) -> Result<Vec<CatalogEntry>, AppError> {
        let entries = sqlx::query_as::<Postgres, CatalogEntry>(
            "SELECT id, created_at FROM media_records ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await;
        self.observe(entries)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_records", db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecordRow>(
            "SELECT * FROM media_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        Ok(self.observe(row)?.map(MediaRecord::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_records", db.operation = "update", db.record_id = %id))]
    async fn increment(&self, id: Uuid, field: CounterField) -> Result<bool, AppError> {
        // Column names come from a closed enum, never from input
        let sql = format!(
            "UPDATE media_records SET {col} = {col} + 1 WHERE id = $1",
            col = field.column()
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await;
        Ok(self.observe(result)?.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, text), fields(db.table = "media_records", db.operation = "update", db.record_id = %id))]
    async fn append_comment(&self, id: Uuid, text: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE media_records SET comments = array_append(comments, $2) WHERE id = $1",
        )
        .bind(id)
        .bind(text)
        .execute(&self.pool)
        .await;
        Ok(self.observe(result)?.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        self.observe(result).map(drop)
    }

    fn readiness(&self) -> ReadinessGate {
        self.reporter.gate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_classified() {
        assert!(is_connection_error(&sqlx::Error::PoolTimedOut));
        assert!(is_connection_error(&sqlx::Error::PoolClosed));
        assert!(is_connection_error(&sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset"
        ))));
        assert!(!is_connection_error(&sqlx::Error::RowNotFound));
    }
}
