//! Visuospatial sketchpad (C9): spatial/file working-memory buffer, capacity 7.

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{Component, WorkingMemoryItem};
use std::collections::HashMap;
use uuid::Uuid;

const FILE_PATH_KEY: &str = "file_path";

/// Manages the visuospatial sketchpad buffer on top of a [`StoreKernel`].
pub struct VisuospatialSketchpad<'a> {
    store: &'a dyn StoreKernel,
    capacity: usize,
}

impl<'a> VisuospatialSketchpad<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel, capacity: usize) -> Self {
        Self { store, capacity }
    }

    /// Insert `item`, evicting the least-recently-accessed item first if
    /// the buffer is already at capacity.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn add_item(&self, item: WorkingMemoryItem) -> Result<()> {
        let existing = self
            .store
            .get_wm_items(&item.project_id, Component::Visuospatial)
            .await?;
        if existing.len() >= self.capacity {
            if let Some(lru) = existing.iter().min_by_key(|i| i.last_accessed) {
                self.store.remove_wm_item(lru.id).await?;
            }
        }
        self.store.upsert_wm_item(&item).await
    }

    /// Items whose `file_path` metadata starts with `directory`.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn find_by_directory(
        &self,
        project_id: &str,
        directory: &str,
    ) -> Result<Vec<WorkingMemoryItem>> {
        Ok(self
            .store
            .get_wm_items(project_id, Component::Visuospatial)
            .await?
            .into_iter()
            .filter(|i| {
                i.metadata
                    .get(FILE_PATH_KEY)
                    .is_some_and(|p| p.starts_with(directory))
            })
            .collect())
    }

    /// The `limit` most recently accessed items.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_recently_accessed_files(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkingMemoryItem>> {
        let mut items = self
            .store
            .get_wm_items(project_id, Component::Visuospatial)
            .await?;
        items.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        items.truncate(limit);
        Ok(items)
    }

    /// Groups buffer items by their immediate parent directory.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_file_hierarchy(
        &self,
        project_id: &str,
    ) -> Result<HashMap<String, Vec<Uuid>>> {
        let mut hierarchy: HashMap<String, Vec<Uuid>> = HashMap::new();
        for item in self
            .store
            .get_wm_items(project_id, Component::Visuospatial)
            .await?
        {
            let Some(path) = item.metadata.get(FILE_PATH_KEY) else {
                continue;
            };
            let dir = path.rsplit_once('/').map_or("", |(dir, _)| dir).to_string();
            hierarchy.entry(dir).or_default().push(item.id);
        }
        Ok(hierarchy)
    }
}
