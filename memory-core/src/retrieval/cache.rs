//! Per-project LRU caches for retrieval (§5): a query-result cache and an
//! embedding cache, each bounded and TTL-expiring. Grounded on the donor's
//! `retrieval::cache` module (`QueryCache`/`CacheKey`/`CacheMetrics` shape),
//! adapted from per-episode results to this crate's [`super::RetrievalResult`].
//!
//! Caches are opt-in: [`super::RetrievalEngine`] works without one: The host
//! process constructs one [`RetrievalCache`] per project and passes it in,
//! matching §5's "caches are per-project LRUs" (not a single process-wide
//! cache keyed internally by project id).

use super::RetrievalResult;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use lru::LruCache;

/// Default time-to-live for a cached query result.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default maximum number of cached queries per project.
pub const DEFAULT_MAX_ENTRIES: usize = 1_000;

/// Identifies one retrieval query's parameters for cache lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query_text: String,
    pub spatial_context: Option<String>,
    pub max_spatial_depth: usize,
    pub k: usize,
}

impl CacheKey {
    #[must_use]
    pub fn new(
        query_text: impl Into<String>,
        spatial_context: Option<&str>,
        max_spatial_depth: usize,
        k: usize,
    ) -> Self {
        Self {
            query_text: query_text.into(),
            spatial_context: spatial_context.map(ToOwned::to_owned),
            max_spatial_depth,
            k,
        }
    }

    fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        Hash::hash(self, &mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, Clone)]
struct CachedResult {
    results: Vec<RetrievalResult>,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedResult {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() >= self.ttl
    }
}

/// Hit/miss/eviction/invalidation counters, read back via [`RetrievalCache::metrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
}

impl CacheMetrics {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A project-scoped cache of [`super::RetrievalEngine::query_spatial_semantic`]
/// results, keyed on the query's parameters. Invalidated wholesale whenever
/// new events land for the project — the same conservative
/// invalidate-on-write policy the donor's cache documents, since tracking
/// which cached queries a given new event could affect is not worth the
/// complexity at this crate's scale.
pub struct RetrievalCache {
    entries: RwLock<LruCache<u64, CachedResult>>,
    metrics: RwLock<CacheMetrics>,
    ttl: Duration,
}

impl RetrievalCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity_and_ttl(DEFAULT_MAX_ENTRIES, DEFAULT_CACHE_TTL)
    }

    #[must_use]
    pub fn with_capacity_and_ttl(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            metrics: RwLock::new(CacheMetrics::default()),
            ttl,
        }
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Vec<RetrievalResult>> {
        let hash = key.compute_hash();
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        let mut metrics = self.metrics.write().unwrap_or_else(|p| p.into_inner());
        match entries.get(&hash) {
            Some(cached) if cached.is_expired() => {
                entries.pop(&hash);
                metrics.misses += 1;
                metrics.evictions += 1;
                None
            }
            Some(cached) => {
                metrics.hits += 1;
                Some(cached.results.clone())
            }
            None => {
                metrics.misses += 1;
                None
            }
        }
    }

    pub fn put(&self, key: CacheKey, results: Vec<RetrievalResult>) {
        let hash = key.compute_hash();
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries.put(
            hash,
            CachedResult {
                results,
                cached_at: Instant::now(),
                ttl: self.ttl,
            },
        );
    }

    /// Drop every cached query result. Called after an ingest that could
    /// change any query's answer (new event, consolidation, inhibition).
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        let mut metrics = self.metrics.write().unwrap_or_else(|p| p.into_inner());
        metrics.invalidations += entries.len() as u64;
        entries.clear();
    }

    #[must_use]
    pub fn metrics(&self) -> CacheMetrics {
        *self.metrics.read().unwrap_or_else(|p| p.into_inner())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RetrievalCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A project-scoped cache of embedder outputs keyed by source text, so a
/// query or ingest stage repeating the same string (the pipeline's own
/// recent-event window often does) skips a redundant embedder round trip.
pub struct EmbeddingCache {
    entries: RwLock<LruCache<u64, Vec<f32>>>,
    metrics: RwLock<CacheMetrics>,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            metrics: RwLock::new(CacheMetrics::default()),
        }
    }

    fn key(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    #[must_use]
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        let mut metrics = self.metrics.write().unwrap_or_else(|p| p.into_inner());
        match entries.get(&Self::key(text)) {
            Some(v) => {
                metrics.hits += 1;
                Some(v.clone())
            }
            None => {
                metrics.misses += 1;
                None
            }
        }
    }

    pub fn put(&self, text: &str, embedding: Vec<f32>) {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries.put(Self::key(text), embedding);
    }

    #[must_use]
    pub fn metrics(&self) -> CacheMetrics {
        *self.metrics.read().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Event, EventContext};
    use chrono::Utc;

    fn sample_result(content: &str) -> RetrievalResult {
        RetrievalResult {
            event: Event {
                id: uuid::Uuid::new_v4(),
                project_id: "p".to_string(),
                session_id: None,
                timestamp: Utc::now(),
                event_type: "agent_action".to_string(),
                content: content.to_string(),
                context: EventContext::default(),
                embedding: None,
                consolidated: false,
                wm_id: None,
            },
            combined_score: 0.5,
            semantic_score: 0.5,
            spatial_score: 0.0,
            inhibition: 0.0,
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = RetrievalCache::new();
        let key = CacheKey::new("find the bug", None, 2, 5);
        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), vec![sample_result("found it")]);
        let hit = cache.get(&key).expect("cache hit");
        assert_eq!(hit.len(), 1);
        assert_eq!(cache.metrics().hits, 1);
        assert_eq!(cache.metrics().misses, 1);
    }

    #[test]
    fn expired_entry_counts_as_miss_and_eviction() {
        let cache = RetrievalCache::with_capacity_and_ttl(10, Duration::from_millis(1));
        let key = CacheKey::new("find the bug", None, 2, 5);
        cache.put(key.clone(), vec![sample_result("found it")]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.metrics().evictions, 1);
    }

    #[test]
    fn invalidate_all_clears_entries_and_counts_invalidations() {
        let cache = RetrievalCache::new();
        cache.put(CacheKey::new("a", None, 2, 5), vec![sample_result("x")]);
        cache.put(CacheKey::new("b", None, 2, 5), vec![sample_result("y")]);
        assert_eq!(cache.len(), 2);
        cache.invalidate_all();
        assert!(cache.is_empty());
        assert_eq!(cache.metrics().invalidations, 2);
    }

    #[test]
    fn embedding_cache_roundtrips() {
        let cache = EmbeddingCache::new(16);
        assert!(cache.get("hello").is_none());
        cache.put("hello", vec![1.0, 2.0, 3.0]);
        assert_eq!(cache.get("hello"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(cache.metrics().hits, 1);
        assert_eq!(cache.metrics().misses, 1);
    }
}
