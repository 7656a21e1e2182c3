//! Episodic store (C5): append-only event log with relations between events.

use crate::embeddings::{embed_with_fallback, Embedder};
use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{Event, EventRelation};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Records and queries events on top of a [`StoreKernel`].
pub struct EpisodicStore<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> EpisodicStore<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// Embed `event.content` (falling back to no embedding if the provider
    /// is unavailable, §4.13) and persist the event.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn record_event(&self, mut event: Event, embedder: &dyn Embedder) -> Result<Event> {
        if event.embedding.is_none() {
            event.embedding = embed_with_fallback(embedder, &event.content).await.ok();
        }
        self.store.record_event(&event).await?;
        Ok(event)
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_recent_events(&self, project_id: &str, limit: usize) -> Result<Vec<Event>> {
        self.store.get_recent_events(project_id, limit).await
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_events_by_date(
        &self,
        project_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        self.store.get_events_by_date(project_id, start, end).await
    }

    /// The embedding stored alongside an event, if any.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_event_embedding(&self, id: Uuid) -> Result<Option<Vec<f32>>> {
        Ok(self.store.get_event(id).await?.and_then(|e| e.embedding))
    }

    /// # Errors
    /// Returns an error if either endpoint is missing or the write fails.
    pub async fn create_event_relation(&self, relation: &EventRelation) -> Result<()> {
        self.store.create_event_relation(relation).await
    }
}
