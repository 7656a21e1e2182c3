//! Phonological loop (C9): verbal working-memory buffer, capacity 7.

use super::decay::item_activation;
use crate::embeddings::cosine_similarity;
use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{Component, WorkingMemoryItem};
use chrono::Utc;
use uuid::Uuid;

/// Manages the phonological loop buffer on top of a [`StoreKernel`].
pub struct PhonologicalLoop<'a> {
    store: &'a dyn StoreKernel,
    capacity: usize,
}

impl<'a> PhonologicalLoop<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// Insert `item`, evicting the single lowest-activation item first if
    /// the buffer is already at capacity (§3, §4.7: evictions happen
    /// before inserts).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn add_item(&self, item: WorkingMemoryItem) -> Result<()> {
        let existing = self
            .store
            .get_wm_items(&item.project_id, Component::Phonological)
            .await?;
        if existing.len() >= self.capacity {
            let now = Utc::now();
            if let Some(weakest) = existing
                .iter()
                .min_by(|a, b| {
                    item_activation(a, now)
                        .partial_cmp(&item_activation(b, now))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
            {
                self.store.remove_wm_item(weakest.id).await?;
            }
        }
        self.store.upsert_wm_item(&item).await
    }

    /// Reset `id`'s activation to 1.0 and refresh `last_accessed` (§4.7).
    ///
    /// # Errors
    /// Returns an error if `id` doesn't exist in this buffer or the write fails.
    pub async fn rehearse(&self, project_id: &str, id: Uuid) -> Result<()> {
        let mut items = self
            .store
            .get_wm_items(project_id, Component::Phonological)
            .await?;
        if let Some(item) = items.iter_mut().find(|i| i.id == id) {
            item.activation_level = 1.0;
            item.last_accessed = Utc::now();
            self.store.upsert_wm_item(item).await?;
        }
        Ok(())
    }

    /// Rank buffer items by `score = 0.7·cos_sim(query, item.embedding) +
    /// 0.3·current_activation` (§4.7), descending.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn search(
        &self,
        project_id: &str,
        query_embedding: &[f32],
    ) -> Result<Vec<(WorkingMemoryItem, f32)>> {
        let now = Utc::now();
        let mut scored: Vec<(WorkingMemoryItem, f32)> = self
            .store
            .get_wm_items(project_id, Component::Phonological)
            .await?
            .into_iter()
            .map(|item| {
                let cos = item
                    .embedding
                    .as_ref()
                    .map_or(0.0, |e| cosine_similarity(query_embedding, e));
                let activation = item_activation(&item, now);
                let score = 0.7 * cos + 0.3 * activation;
                (item, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored)
    }
}
