//! Episodic buffer (C9): the integrator, capacity 4.

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{Component, ContentType, WorkingMemoryItem};
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

/// Manages the episodic buffer on top of a [`StoreKernel`].
pub struct EpisodicBuffer<'a> {
    store: &'a dyn StoreKernel,
    capacity: usize,
}

impl<'a> EpisodicBuffer<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel, capacity: usize) -> Self {
        Self { store, capacity }
    }

    async fn evict_weakest_if_full(&self, project_id: &str) -> Result<()> {
        let existing = self
            .store
            .get_wm_items(project_id, Component::EpisodicBuffer)
            .await?;
        if existing.len() >= self.capacity {
            if let Some(oldest) = existing.iter().min_by_key(|i| i.created_at) {
                self.store.remove_wm_item(oldest.id).await?;
            }
        }
        Ok(())
    }

    /// Bind a phonological and/or visuospatial item into a composite
    /// episodic-buffer slot, recording the source ids in metadata.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn bind_items(
        &self,
        project_id: &str,
        phonological_id: Option<Uuid>,
        visuospatial_id: Option<Uuid>,
        description: &str,
    ) -> Result<WorkingMemoryItem> {
        self.evict_weakest_if_full(project_id).await?;

        let mut metadata = HashMap::new();
        if let Some(id) = phonological_id {
            metadata.insert("phonological_id".to_string(), id.to_string());
        }
        if let Some(id) = visuospatial_id {
            metadata.insert("visuospatial_id".to_string(), id.to_string());
        }

        let now = Utc::now();
        let item = WorkingMemoryItem {
            id: Uuid::new_v4(),
            project_id: project_id.to_string(),
            content: description.to_string(),
            content_type: ContentType::Episodic,
            component: Component::EpisodicBuffer,
            activation_level: 1.0,
            created_at: now,
            last_accessed: now,
            decay_rate: 0.1,
            importance: 0.5,
            embedding: None,
            metadata,
        };
        self.store.upsert_wm_item(&item).await?;
        Ok(item)
    }

    /// Package up to 5 items as a single chunked slot, raising effective
    /// capacity (§4.7).
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidInput`] if more than 5 items
    /// are given, otherwise an error if the underlying store fails.
    pub async fn create_chunk(
        &self,
        project_id: &str,
        items: &[Uuid],
    ) -> Result<WorkingMemoryItem> {
        if items.len() > 5 {
            return Err(crate::error::Error::InvalidInput(
                "chunk may hold at most 5 items".to_string(),
            ));
        }
        self.evict_weakest_if_full(project_id).await?;

        let mut metadata = HashMap::new();
        metadata.insert(
            "chunk_members".to_string(),
            items.iter().map(Uuid::to_string).collect::<Vec<_>>().join(","),
        );

        let now = Utc::now();
        let item = WorkingMemoryItem {
            id: Uuid::new_v4(),
            project_id: project_id.to_string(),
            content: format!("chunk of {} items", items.len()),
            content_type: ContentType::Episodic,
            component: Component::EpisodicBuffer,
            activation_level: 1.0,
            created_at: now,
            last_accessed: now,
            decay_rate: 0.1,
            importance: 0.5,
            embedding: None,
            metadata,
        };
        self.store.upsert_wm_item(&item).await?;
        Ok(item)
    }
}
