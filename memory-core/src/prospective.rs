//! Prospective store (C8): reminders/tasks that activate on a due date or tag.

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::ProspectiveTask;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Manages prospective tasks on top of a [`StoreKernel`].
pub struct ProspectiveStore<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> ProspectiveStore<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn create_task(&self, task: &ProspectiveTask) -> Result<()> {
        self.store.insert_prospective_task(task).await
    }

    /// All pending tasks whose activation condition is currently met
    /// (§3: due date passed, or `tag` matches `activation_tag`).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn get_activated_tasks(
        &self,
        project_id: &str,
        now: DateTime<Utc>,
        tag: Option<&str>,
    ) -> Result<Vec<ProspectiveTask>> {
        Ok(self
            .store
            .get_pending_prospective_tasks(project_id)
            .await?
            .into_iter()
            .filter(|t| t.is_activated(now, tag))
            .collect())
    }

    /// # Errors
    /// Returns an error if `id` doesn't exist or the write fails.
    pub async fn complete(&self, id: Uuid) -> Result<()> {
        self.store.complete_prospective_task(id).await
    }
}
