//! Saliency calculator (C11): a `[0,1]` importance score blending
//! frequency, recency, relevance, and surprise.

use crate::embeddings::cosine_to_unit;
use crate::types::SaliencyWeights;
use chrono::{DateTime, Utc};

/// Value substituted for any subfactor whose computation fails — an
/// explicit "unknown", never propagated as an error (§4.8).
pub const UNKNOWN_SCORE: f32 = 0.5;

/// `[0.7,1]` primary, `[0.4,0.7)` secondary, `[0,0.4)` background (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaliencyBand {
    Primary,
    Secondary,
    Background,
}

/// Classify a saliency score into its band using the `≥` convention at
/// each boundary.
#[must_use]
pub fn band(saliency: f32) -> SaliencyBand {
    if saliency >= 0.7 {
        SaliencyBand::Primary
    } else if saliency >= 0.4 {
        SaliencyBand::Secondary
    } else {
        SaliencyBand::Background
    }
}

/// `min(1, access_count / max_access_in_layer)`. Returns [`UNKNOWN_SCORE`]
/// when `max_access_in_layer == 0`.
#[must_use]
pub fn frequency(access_count: u64, max_access_in_layer: u64) -> f32 {
    if max_access_in_layer == 0 {
        return UNKNOWN_SCORE;
    }
    (access_count as f32 / max_access_in_layer as f32).min(1.0)
}

/// `exp(−age_days / 7)`, half-life 7 days.
#[must_use]
pub fn recency(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let age_days = (now - created_at).num_milliseconds().max(0) as f32 / 86_400_000.0;
    (-age_days / 7.0).exp().clamp(0.0, 1.0)
}

/// Cosine similarity between `memory_embedding` and `goal_embedding`
/// mapped to `[0,1]`; falls back to `usefulness_score` when there's no
/// goal, and to [`UNKNOWN_SCORE`] when neither exists.
#[must_use]
pub fn relevance(
    memory_embedding: Option<&[f32]>,
    goal_embedding: Option<&[f32]>,
    usefulness_score: Option<f32>,
) -> f32 {
    match (memory_embedding, goal_embedding) {
        (Some(m), Some(g)) => cosine_to_unit(crate::embeddings::cosine_similarity(m, g)),
        _ => usefulness_score.unwrap_or(UNKNOWN_SCORE).clamp(0.0, 1.0),
    }
}

/// `1 − ((avg_cos_sim_to_last_5_context_events + 1)/2)`; `0.0` when
/// `context_embeddings` is empty.
#[must_use]
pub fn surprise(memory_embedding: &[f32], context_embeddings: &[Vec<f32>]) -> f32 {
    if context_embeddings.is_empty() {
        return 0.0;
    }
    let recent = &context_embeddings[context_embeddings.len().saturating_sub(5)..];
    let avg_cos: f32 = recent
        .iter()
        .map(|e| crate::embeddings::cosine_similarity(memory_embedding, e))
        .sum::<f32>()
        / recent.len() as f32;
    (1.0 - ((avg_cos + 1.0) / 2.0)).clamp(0.0, 1.0)
}

/// Weighted sum of all four subfactors using `weights` (default 0.30
/// frequency / 0.30 recency / 0.25 relevance / 0.15 surprise).
#[must_use]
pub fn saliency(
    weights: &SaliencyWeights,
    frequency: f32,
    recency: f32,
    relevance: f32,
    surprise: f32,
) -> f32 {
    (weights.frequency * frequency.clamp(0.0, 1.0)
        + weights.recency * recency.clamp(0.0, 1.0)
        + weights.relevance * relevance.clamp(0.0, 1.0)
        + weights.surprise * surprise.clamp(0.0, 1.0))
    .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_inclusive_lower_bound() {
        assert_eq!(band(0.7), SaliencyBand::Primary);
        assert_eq!(band(0.69999), SaliencyBand::Secondary);
        assert_eq!(band(0.4), SaliencyBand::Secondary);
        assert_eq!(band(0.39999), SaliencyBand::Background);
    }

    #[test]
    fn frequency_saturates_at_one() {
        assert_eq!(frequency(10, 5), 1.0);
        assert_eq!(frequency(0, 0), UNKNOWN_SCORE);
    }

    #[test]
    fn recency_decays_with_age() {
        let now = Utc::now();
        let fresh = recency(now, now);
        let week_old = recency(now - chrono::Duration::days(7), now);
        assert!((fresh - 1.0).abs() < 1e-6);
        assert!((week_old - (-1.0_f32).exp()).abs() < 1e-3);
    }

    #[test]
    fn relevance_falls_back_without_goal() {
        assert_eq!(relevance(Some(&[1.0]), None, Some(0.8)), 0.8);
        assert_eq!(relevance(None, None, None), UNKNOWN_SCORE);
    }

    #[test]
    fn surprise_is_zero_without_context() {
        assert_eq!(surprise(&[1.0, 0.0], &[]), 0.0);
    }
}
