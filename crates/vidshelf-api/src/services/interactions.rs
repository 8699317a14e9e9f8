//! View, like, dislike and comment recording.
//!
//! Every call validates the identifier before the catalog is touched and answers
//! the same way whether or not the record exists.

use std::sync::Arc;
use uuid::Uuid;
use vidshelf_core::models::CounterField;
use vidshelf_core::{AppError, ReadinessGate};
use vidshelf_db::CatalogStore;

#[derive(Clone)]
pub struct InteractionService {
    gate: ReadinessGate,
    catalog: Arc<dyn CatalogStore>,
    max_comment_length: usize,
}

impl InteractionService {
    pub fn new(gate: ReadinessGate, catalog: Arc<dyn CatalogStore>, max_comment_length: usize) -> Self {
        Self {
            gate,
            catalog,
            max_comment_length,
        }
    }

    pub async fn record_view(&self, id: &str) -> Result<(), AppError> {
        self.increment(id, CounterField::Views).await
    }

    pub async fn record_like(&self, id: &str) -> Result<(), AppError> {
        self.increment(id, CounterField::Likes).await
    }

    pub async fn record_dislike(&self, id: &str) -> Result<(), AppError> {
        self.increment(id, CounterField::Dislikes).await
    }

    #[tracing::instrument(skip(self, text), fields(media_id = %id))]
    pub async fn add_comment(&self, id: &str, text: &str) -> Result<(), AppError> {
        let id = parse_id(id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::InvalidInput("Comment text is required".to_string()));
        }
        if text.chars().count() > self.max_comment_length {
            return Err(AppError::InvalidInput(format!(
                "Comment exceeds {} characters",
                self.max_comment_length
            )));
        }
        self.gate.ensure_ready()?;

        if !self.catalog.append_comment(id, text).await? {
            tracing::debug!(media_id = %id, "Comment for unknown media record ignored");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(media_id = %id, counter = field.column()))]
    async fn increment(&self, id: &str, field: CounterField) -> Result<(), AppError> {
        let id = parse_id(id)?;
        self.gate.ensure_ready()?;

        if !self.catalog.increment(id, field).await? {
            tracing::debug!(media_id = %id, counter = field.column(), "Interaction for unknown media record ignored");
        }
        Ok(())
    }
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim())
        .map_err(|_| AppError::InvalidIdentifier(format!("'{}' is not a valid media id", id)))
}
