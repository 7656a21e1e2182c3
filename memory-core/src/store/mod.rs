//! Storage abstraction (C3).
//!
//! A single trait covers every storage-backed component (C4-C16) so the
//! rest of the crate is engine-agnostic. Concrete backends (redb, libsql)
//! live in sibling crates and implement [`StoreKernel`] directly — async
//! throughout, whether the underlying engine is sync (redb, wrapped in
//! `spawn_blocking`) or natively async (libsql).

pub mod transaction;

pub use transaction::Transaction;

use crate::error::Result;
use crate::types::{
    AttentionFocus, ConsolidationRoute, Event, EventRelation, Goal, InhibitionRecord,
    ProceduralTemplate, ProspectiveTask, SemanticRecord, SpatialNode, SpatialRelation,
    WorkingMemoryItem,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unified storage backend trait.
///
/// Every method is independently atomic; callers needing cross-entity
/// atomicity use [`StoreKernel::transaction`] instead.
#[async_trait]
pub trait StoreKernel: Send + Sync {
    // ---- episodic (C5) ----

    /// Persist a new event. Errors with [`crate::error::Error::SchemaMismatch`]
    /// if `event.embedding` is `Some` and its length disagrees with the
    /// store's configured embedding dimension.
    ///
    /// # Errors
    /// Returns an error if the write fails or the schema check fails.
    async fn record_event(&self, event: &Event) -> Result<()>;

    /// Fetch a single event by id.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// Most recent `limit` events for `project_id`, descending by `timestamp`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_recent_events(&self, project_id: &str, limit: usize) -> Result<Vec<Event>>;

    /// Events for `project_id` with `timestamp` within `[start, end]`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_events_by_date(
        &self,
        project_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>>;

    /// Count of events for `project_id` with `consolidated == false`, used
    /// by the consolidation pipeline (C15) to size its batch.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn count_unprocessed_events(&self, project_id: &str) -> Result<usize>;

    /// Mark an event consolidated (and therefore excluded from future
    /// pipeline runs). Idempotent.
    ///
    /// # Errors
    /// Returns an error if the underlying write fails.
    async fn mark_event_consolidated(&self, id: Uuid) -> Result<()>;

    /// Link two events by `relation`.
    ///
    /// # Errors
    /// Returns an error if either endpoint is missing or the write fails.
    async fn create_event_relation(&self, relation: &EventRelation) -> Result<()>;

    // ---- semantic (C6) ----

    /// Insert or, if a record with equivalent `content` already exists in
    /// the layer, leave the existing row untouched (§4.6 dedup rule).
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn upsert_semantic_record(&self, record: &SemanticRecord) -> Result<Uuid>;

    /// Fetch a single semantic record.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_semantic_record(&self, id: Uuid) -> Result<Option<SemanticRecord>>;

    /// All active semantic records for `project_id`, for similarity search
    /// or saliency scoring. Callers filter/rank in memory — the store
    /// performs no vector search itself.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_active_semantic_records(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<SemanticRecord>>;

    /// Mark a semantic record active or inactive.
    ///
    /// # Errors
    /// Returns an error if the record doesn't exist or the write fails.
    async fn set_semantic_active(&self, id: Uuid, active: bool) -> Result<()>;

    // ---- procedural (C7) ----

    /// Insert a procedural template.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn insert_procedural_template(&self, template: &ProceduralTemplate) -> Result<()>;

    /// All procedural templates for `project_id` ordered by `frequency`
    /// descending.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_procedural_templates(&self, project_id: &str) -> Result<Vec<ProceduralTemplate>>;

    /// Increment a template's usage `frequency` by one.
    ///
    /// # Errors
    /// Returns an error if the template doesn't exist or the write fails.
    async fn record_procedural_usage(&self, id: Uuid) -> Result<()>;

    // ---- prospective (C8) ----

    /// Insert a prospective task.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn insert_prospective_task(&self, task: &ProspectiveTask) -> Result<()>;

    /// All prospective tasks for `project_id` with `completed == false`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_pending_prospective_tasks(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProspectiveTask>>;

    /// Mark a prospective task complete.
    ///
    /// # Errors
    /// Returns an error if the task doesn't exist or the write fails.
    async fn complete_prospective_task(&self, id: Uuid) -> Result<()>;

    // ---- working memory (C9) ----

    /// Persist (or overwrite) a working-memory item, keyed by `(component, id)`.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn upsert_wm_item(&self, item: &WorkingMemoryItem) -> Result<()>;

    /// All items currently held in `component`'s buffer for `project_id`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_wm_items(
        &self,
        project_id: &str,
        component: crate::types::Component,
    ) -> Result<Vec<WorkingMemoryItem>>;

    /// Remove a working-memory item, e.g. on eviction or consolidation.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn remove_wm_item(&self, id: Uuid) -> Result<()>;

    // ---- central executive (C10) ----

    /// Insert or update a goal.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn upsert_goal(&self, goal: &Goal) -> Result<()>;

    /// Fetch a single goal.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_goal(&self, id: Uuid) -> Result<Option<Goal>>;

    /// Goals for `project_id` with `status == Active`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_active_goals(&self, project_id: &str) -> Result<Vec<Goal>>;

    /// Direct children of `parent_id` within `project_id` (or top-level
    /// goals when `None`).
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_child_goals(
        &self,
        project_id: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Vec<Goal>>;

    /// Insert or replace the current attention focus record.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn upsert_attention_focus(&self, focus: &AttentionFocus) -> Result<()>;

    /// Currently active focuses for `project_id` (`ended_at.is_none()`).
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_active_focuses(&self, project_id: &str) -> Result<Vec<AttentionFocus>>;

    /// Close out the current primary focus for `project_id` by setting
    /// `ended_at`.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn end_primary_focus(&self, project_id: &str) -> Result<()>;

    // ---- spatial (C4) ----

    /// Insert a spatial node if a node with the same `(project_id, full_path)`
    /// doesn't already exist.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn upsert_spatial_node(&self, node: &SpatialNode) -> Result<()>;

    /// Look up a spatial node by its unique `(project_id, full_path)`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn find_spatial_node_by_path(
        &self,
        project_id: &str,
        full_path: &str,
    ) -> Result<Option<SpatialNode>>;

    /// Insert a relation between two spatial nodes, skipping it if an
    /// equivalent `(from_path, to_path, relation_type)` edge already exists.
    ///
    /// # Errors
    /// Returns an error if either endpoint is missing or the write fails.
    async fn upsert_spatial_relation(&self, relation: &SpatialRelation) -> Result<()>;

    /// Edges directly touching `full_path`, in either direction.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_spatial_relations(
        &self,
        project_id: &str,
        full_path: &str,
    ) -> Result<Vec<SpatialRelation>>;

    // ---- inhibition (C13) ----

    /// Append an inhibition record. Inhibition is modeled as independently
    /// decaying rows summed at read time (§4.12) — never mutated in place.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn insert_inhibition_record(&self, record: &InhibitionRecord) -> Result<()>;

    /// All inhibition records targeting `target_id`.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_inhibition_records(&self, target_id: Uuid) -> Result<Vec<InhibitionRecord>>;

    /// Delete inhibition records whose contribution has decayed below a
    /// garbage-collection floor. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn gc_inhibition_records(&self, min_strength: f32) -> Result<usize>;

    // ---- consolidation (C14) ----

    /// Record a routing decision for later feedback/retraining.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn insert_consolidation_route(&self, route: &ConsolidationRoute) -> Result<()>;

    /// The most recent `limit` routing decisions for `project_id`, most
    /// recent first.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    async fn get_recent_consolidation_routes(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<ConsolidationRoute>>;

    /// Run `body` inside a transaction; the whole closure's writes commit
    /// atomically or none do.
    ///
    /// # Errors
    /// Returns an error if `body` fails or the commit fails.
    async fn transaction(&self, body: Box<dyn FnOnce(&dyn Transaction) -> Result<()> + Send>) -> Result<()>;
}
