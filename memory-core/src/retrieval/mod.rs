//! Retrieval engine (C16): two-stage spatial → semantic search with
//! inhibition applied (§4.13).

pub mod cache;

pub use cache::{CacheKey, CacheMetrics, EmbeddingCache, RetrievalCache};

use crate::embeddings::{cosine_similarity, cosine_to_unit, jaccard_similarity, Embedder};
use crate::error::Result;
use crate::inhibition;
use crate::spatial::{path_distance, SpatialIndex};
use crate::store::StoreKernel;
use crate::types::{Event, MemoryLayer};
use chrono::{Duration, Utc};

/// Default lookback window when no spatial context narrows the coarse
/// filter (§4.13, stage 1).
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Upper bound on coarse-stage candidates, applied to both branches of
/// stage 1.
pub const MAX_CANDIDATES: usize = 1000;

/// Default breadth-first depth for the coarse spatial filter.
pub const DEFAULT_MAX_SPATIAL_DEPTH: usize = 2;

/// Default result count.
pub const DEFAULT_K: usize = 5;

/// Denominator in the spatial-score formula `max(0, 1 − distance/10)`.
const SPATIAL_DISTANCE_SCALE: f32 = 10.0;

/// A scored event returned by [`RetrievalEngine::query_spatial_semantic`].
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub event: Event,
    pub combined_score: f32,
    pub semantic_score: f32,
    pub spatial_score: f32,
    pub inhibition: f32,
}

/// Runs the two-stage retrieval query on top of a [`StoreKernel`].
pub struct RetrievalEngine<'a> {
    store: &'a dyn StoreKernel,
    semantic_weight: f32,
    inhibition_half_life_s: i64,
}

impl<'a> RetrievalEngine<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel, semantic_weight: f32, inhibition_half_life_s: i64) -> Self {
        Self {
            store,
            semantic_weight: semantic_weight.clamp(0.0, 1.0),
            inhibition_half_life_s,
        }
    }

    /// Stage 1 (coarse): candidates near `spatial_context` within
    /// `max_spatial_depth` hops, or every event in the default 365-day
    /// window when there's no spatial context. Bounded at
    /// [`MAX_CANDIDATES`] either way.
    async fn coarse_candidates(
        &self,
        project_id: &str,
        spatial_context: Option<&str>,
        max_spatial_depth: usize,
    ) -> Result<Vec<Event>> {
        match spatial_context {
            Some(center) => {
                let index = SpatialIndex::new(self.store);
                let paths = index
                    .neighborhood(project_id, center, max_spatial_depth)
                    .await?;
                let recent = self
                    .store
                    .get_recent_events(project_id, MAX_CANDIDATES)
                    .await?;
                Ok(recent
                    .into_iter()
                    .filter(|e| {
                        e.context
                            .cwd
                            .as_deref()
                            .is_some_and(|cwd| paths.iter().any(|p| p == cwd))
                    })
                    .collect())
            }
            None => {
                let end = Utc::now();
                let start = end - Duration::days(DEFAULT_WINDOW_DAYS);
                let mut events = self.store.get_events_by_date(project_id, start, end).await?;
                events.truncate(MAX_CANDIDATES);
                Ok(events)
            }
        }
    }

    /// Stage 2 (fine): semantic similarity (embedding cosine, falling
    /// back to Jaccard token overlap when either side lacks an
    /// embedding), blended with a spatial proximity score.
    async fn score(
        &self,
        event: &Event,
        query_text: &str,
        query_embedding: Option<&[f32]>,
        spatial_context: Option<&str>,
        max_spatial_depth: usize,
    ) -> Result<(f32, f32)> {
        let semantic_score = match (query_embedding, event.embedding.as_ref()) {
            (Some(q), Some(e)) => cosine_to_unit(cosine_similarity(q, e)),
            _ => jaccard_similarity(query_text, &event.content),
        };

        let spatial_score = match (spatial_context, event.context.cwd.as_deref()) {
            (Some(center), Some(cwd)) => {
                let index = SpatialIndex::new(self.store);
                let distance = match index
                    .distance(event.project_id.as_str(), center, cwd, max_spatial_depth.max(10))
                    .await?
                {
                    Some(d) => d,
                    None => path_distance(center, cwd),
                };
                (1.0 - distance as f32 / SPATIAL_DISTANCE_SCALE).max(0.0)
            }
            _ => 0.0,
        };

        Ok((semantic_score, spatial_score))
    }

    /// `query_spatial_semantic` (§4.13): coarse spatial/temporal filter,
    /// fine semantic+spatial ranking, inhibition subtracted, top `k`
    /// returned in descending combined-score order.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn query_spatial_semantic(
        &self,
        project_id: &str,
        query_text: &str,
        embedder: &dyn Embedder,
        spatial_context: Option<&str>,
        max_spatial_depth: usize,
        k: usize,
    ) -> Result<Vec<RetrievalResult>> {
        let query_embedding = crate::embeddings::embed_with_fallback(embedder, query_text)
            .await
            .ok();

        let candidates = self
            .coarse_candidates(project_id, spatial_context, max_spatial_depth)
            .await?;

        let mut scored = Vec::with_capacity(candidates.len());
        for event in candidates {
            let (semantic_score, spatial_score) = self
                .score(
                    &event,
                    query_text,
                    query_embedding.as_deref(),
                    spatial_context,
                    max_spatial_depth,
                )
                .await?;
            let combined = self.semantic_weight * semantic_score
                + (1.0 - self.semantic_weight) * spatial_score;
            let inhibition_strength = inhibition::effective_strength(
                self.store,
                event.id,
                self.inhibition_half_life_s,
            )
            .await?;
            let final_score = combined - inhibition_strength;
            if final_score > 0.0 {
                scored.push(RetrievalResult {
                    event,
                    combined_score: final_score,
                    semantic_score,
                    spatial_score,
                    inhibition: inhibition_strength,
                });
            }
        }

        scored.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    /// [`Self::query_spatial_semantic`], consulting `cache` first and
    /// populating it on a miss (§5: per-project search-result LRU).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn query_spatial_semantic_cached(
        &self,
        project_id: &str,
        query_text: &str,
        embedder: &dyn Embedder,
        spatial_context: Option<&str>,
        max_spatial_depth: usize,
        k: usize,
        cache: &RetrievalCache,
    ) -> Result<Vec<RetrievalResult>> {
        let key = CacheKey::new(query_text, spatial_context, max_spatial_depth, k);
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }
        let results = self
            .query_spatial_semantic(
                project_id,
                query_text,
                embedder,
                spatial_context,
                max_spatial_depth,
                k,
            )
            .await?;
        cache.put(key, results.clone());
        Ok(results)
    }
}

/// Whether `layer`/`memory_id` is currently inhibited above `threshold`,
/// a convenience wrapper retrieval call sites use before surfacing a
/// non-event memory (semantic/procedural/prospective) outside the
/// `query_spatial_semantic` path.
///
/// # Errors
/// Returns an error if the underlying store fails.
pub async fn is_inhibited(
    store: &dyn StoreKernel,
    memory_id: uuid::Uuid,
    _layer: MemoryLayer,
    half_life_s: i64,
    threshold: f32,
) -> Result<bool> {
    inhibition::is_inhibited(store, memory_id, half_life_s, threshold).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_score_formula_matches_spec() {
        let d: f32 = 3.0;
        let score = (1.0 - d / SPATIAL_DISTANCE_SCALE).max(0.0);
        assert!((score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn spatial_score_floors_at_zero() {
        let d: f32 = 20.0;
        let score = (1.0 - d / SPATIAL_DISTANCE_SCALE).max(0.0);
        assert_eq!(score, 0.0);
    }
}
