//! Inhibition registry (C13): decaying suppression weights over memories.
//!
//! Modeled as independently decaying records summed at read time rather
//! than mutated in place (§4.10) — superseding or stacking an inhibition
//! never loses the original record's decay history.

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{InhibitionRecord, InhibitionType, MemoryLayer};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Threshold below which [`is_inhibited`] reports suppression (§4.10).
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Floor below which [`gc_inhibitions`] purges a record (§4.10).
pub const DEFAULT_GC_FLOOR: f32 = 0.01;

/// Appends an inhibition record. `expires_at` is `now + duration` when
/// `duration` is given.
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn inhibit(
    store: &dyn StoreKernel,
    project_id: &str,
    memory_id: Uuid,
    memory_layer: MemoryLayer,
    strength: f32,
    inhibition_type: InhibitionType,
    reason: Option<String>,
    duration: Option<chrono::Duration>,
) -> Result<()> {
    let now = Utc::now();
    let record = InhibitionRecord {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        memory_id,
        memory_layer,
        inhibition_strength: strength.clamp(0.0, 1.0),
        inhibition_type,
        reason,
        inhibited_at: now,
        expires_at: duration.map(|d| now + d),
    };
    store.insert_inhibition_record(&record).await
}

fn record_contribution(record: &InhibitionRecord, now: DateTime<Utc>, half_life_s: i64) -> f32 {
    if let Some(expires_at) = record.expires_at {
        if now >= expires_at {
            return 0.0;
        }
    }
    let delta_t = (now - record.inhibited_at).num_seconds().max(0) as f32;
    let half_life = half_life_s.max(1) as f32;
    record.inhibition_strength * 2f32.powf(-delta_t / half_life)
}

/// `Σ base_k · 2^(−Δt_k/H)` over active records for `memory_id`, capped
/// at 1.0 (§4.10).
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn effective_strength(
    store: &dyn StoreKernel,
    memory_id: Uuid,
    half_life_s: i64,
) -> Result<f32> {
    let now = Utc::now();
    let total: f32 = store
        .get_inhibition_records(memory_id)
        .await?
        .iter()
        .map(|r| record_contribution(r, now, half_life_s))
        .sum();
    Ok(total.min(1.0))
}

/// Whether `memory_id`'s effective inhibition strength is at or above
/// `threshold`.
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn is_inhibited(
    store: &dyn StoreKernel,
    memory_id: Uuid,
    half_life_s: i64,
    threshold: f32,
) -> Result<bool> {
    Ok(effective_strength(store, memory_id, half_life_s).await? >= threshold)
}

/// Purges inhibition records whose effective strength has decayed below
/// `min_strength`; returns the number removed. Intended to run
/// periodically rather than on every read.
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn gc_inhibitions(store: &dyn StoreKernel, min_strength: f32) -> Result<usize> {
    store.gc_inhibition_records(min_strength).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_decays_by_half_life() {
        let record = InhibitionRecord {
            id: Uuid::new_v4(),
            project_id: "p".to_string(),
            memory_id: Uuid::new_v4(),
            memory_layer: MemoryLayer::Semantic,
            inhibition_strength: 1.0,
            inhibition_type: InhibitionType::Proactive,
            reason: None,
            inhibited_at: Utc::now() - chrono::Duration::seconds(1800),
            expires_at: None,
        };
        let contribution = record_contribution(&record, Utc::now(), 1800);
        assert!((contribution - 0.5).abs() < 0.01);
    }

    #[test]
    fn expired_record_contributes_nothing() {
        let now = Utc::now();
        let record = InhibitionRecord {
            id: Uuid::new_v4(),
            project_id: "p".to_string(),
            memory_id: Uuid::new_v4(),
            memory_layer: MemoryLayer::Semantic,
            inhibition_strength: 1.0,
            inhibition_type: InhibitionType::Selective,
            reason: None,
            inhibited_at: now - chrono::Duration::seconds(10),
            expires_at: Some(now - chrono::Duration::seconds(1)),
        };
        assert_eq!(record_contribution(&record, now, 1800), 0.0);
    }
}
