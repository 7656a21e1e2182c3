//! Semantic store (C6): deduplicated facts/concepts with nearest-neighbor
//! search by embedding.

use crate::embeddings::cosine_similarity;
use crate::error::Result;
use crate::llm::{detect_contradiction, LlmClient};
use crate::store::StoreKernel;
use crate::types::SemanticRecord;
use chrono::Utc;
use uuid::Uuid;

/// Manages semantic records on top of a [`StoreKernel`].
pub struct SemanticStore<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> SemanticStore<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// Insert `record`, or return the id of an existing active record with
    /// identical `content` in the same layer (§4.6: semantic records
    /// dedup on exact content match).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn create_or_dedup(&self, record: SemanticRecord) -> Result<Uuid> {
        for existing in self
            .store
            .get_active_semantic_records(&record.project_id, usize::MAX)
            .await?
        {
            if existing.content == record.content {
                return Ok(existing.id);
            }
        }
        self.store.upsert_semantic_record(&record).await
    }

    /// Maximum number of existing active records offered to the LLM as
    /// contradiction candidates in one [`Self::create_or_merge`] call —
    /// bounds prompt size the way the pipeline bounds its own per-stage
    /// record windows (§4.12).
    const CONTRADICTION_CANDIDATE_LIMIT: usize = 5;

    /// Insert `record`, deduplicating on exact content match as
    /// [`Self::create_or_dedup`] does, but first asking `llm` (when
    /// configured) whether `record.content` contradicts one of the nearest
    /// existing active records. A detected contradiction marks the old
    /// record inactive and inserts `record` as a new, separate row —
    /// content is never rewritten in place (§3). Without an `llm`, or when
    /// no contradiction is found, falls back to [`Self::create_or_dedup`].
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn create_or_merge(
        &self,
        record: SemanticRecord,
        llm: Option<&dyn LlmClient>,
    ) -> Result<Uuid> {
        let Some(llm) = llm else {
            return self.create_or_dedup(record).await;
        };

        let active = self
            .store
            .get_active_semantic_records(&record.project_id, usize::MAX)
            .await?;

        if active.iter().any(|r| r.content == record.content) {
            return self.create_or_dedup(record).await;
        }

        let mut candidates: Vec<(SemanticRecord, f32)> = if record.embedding.is_empty() {
            active.into_iter().map(|r| (r, 0.0)).collect()
        } else {
            active
                .into_iter()
                .map(|r| {
                    let score = if r.embedding.is_empty() {
                        0.0
                    } else {
                        cosine_similarity(&record.embedding, &r.embedding)
                    };
                    (r, score)
                })
                .collect()
        };
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(Self::CONTRADICTION_CANDIDATE_LIMIT);

        let pairs: Vec<(Uuid, String)> = candidates
            .iter()
            .map(|(r, _)| (r.id, r.content.clone()))
            .collect();

        let Some(contradicted_id) = detect_contradiction(llm, &record.content, &pairs).await else {
            return self.store.upsert_semantic_record(&record).await;
        };

        self.store.set_semantic_active(contradicted_id, false).await?;
        let mut new_record = record;
        new_record.created_at = Utc::now();
        self.store.upsert_semantic_record(&new_record).await
    }

    /// Rank all active records by cosine similarity to `query_embedding`,
    /// descending, returning the top `k`.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn nearest_neighbors(
        &self,
        project_id: &str,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<(SemanticRecord, f32)>> {
        let mut scored: Vec<(SemanticRecord, f32)> = self
            .store
            .get_active_semantic_records(project_id, usize::MAX)
            .await?
            .into_iter()
            .filter(|record| !record.embedding.is_empty())
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                (record, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}
