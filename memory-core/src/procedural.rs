//! Procedural store (C7): reusable action templates ranked by success rate.

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::ProceduralTemplate;
use uuid::Uuid;

/// Manages procedural templates on top of a [`StoreKernel`].
pub struct ProceduralStore<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> ProceduralStore<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn create_template(&self, template: &ProceduralTemplate) -> Result<()> {
        self.store.insert_procedural_template(template).await
    }

    /// Templates ordered by `frequency` descending — the order the
    /// consolidation router and retrieval both assume (§4.7).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn ranked_templates(&self, project_id: &str) -> Result<Vec<ProceduralTemplate>> {
        self.store.get_procedural_templates(project_id).await
    }

    /// Record an application of `id`, incrementing its usage frequency.
    ///
    /// # Errors
    /// Returns an error if `id` doesn't exist or the write fails.
    pub async fn record_usage(&self, id: Uuid) -> Result<()> {
        self.store.record_procedural_usage(id).await
    }
}
