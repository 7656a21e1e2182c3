//! Working-memory capacity enforcement (C10).

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::Component;
use crate::wm::item_activation;
use chrono::Utc;
use uuid::Uuid;

/// Total item count across WM buffers at which the system is considered
/// "at capacity" (§4.7: `at_capacity` iff total ≥ 7).
pub const CAPACITY_THRESHOLD: usize = 7;

/// Result of [`check_capacity`].
#[derive(Debug, Clone, Copy)]
pub struct CapacityStatus {
    pub total_items: usize,
    pub at_capacity: bool,
}

/// Sums WM items across all components for a project.
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn check_capacity(store: &dyn StoreKernel, project_id: &str) -> Result<CapacityStatus> {
    let mut total = 0usize;
    for component in [
        Component::Phonological,
        Component::Visuospatial,
        Component::EpisodicBuffer,
        Component::CentralExecutive,
    ] {
        total += store.get_wm_items(project_id, component).await?.len();
    }
    Ok(CapacityStatus {
        total_items: total,
        at_capacity: total >= CAPACITY_THRESHOLD,
    })
}

/// Removes the `count` least-active items across all WM buffers,
/// returning their ids so callers can route them through consolidation
/// (C14).
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn trigger_consolidation(
    store: &dyn StoreKernel,
    project_id: &str,
    count: usize,
) -> Result<Vec<Uuid>> {
    let now = Utc::now();
    let mut items = Vec::new();
    for component in [
        Component::Phonological,
        Component::Visuospatial,
        Component::EpisodicBuffer,
        Component::CentralExecutive,
    ] {
        items.extend(store.get_wm_items(project_id, component).await?);
    }
    items.sort_by(|a, b| {
        item_activation(a, now)
            .partial_cmp(&item_activation(b, now))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(count);
    Ok(items.into_iter().map(|i| i.id).collect())
}
