#![allow(clippy::module_name_repetitions)]

//! # Memory Core
//!
//! A cognitive memory substrate for long-running AI agents: a persistent,
//! queryable store modeled on a simplified account of human memory. It
//! accepts a continuous stream of events (agent actions, observations,
//! conversational turns, code-analysis results) and surfaces the right
//! subset at the right time, weighted by recency, frequency,
//! task-relevance, novelty, and spatial/semantic proximity.
//!
//! ## Layers
//!
//! - [`wm`] — Working Memory: a capacity-bounded (7±2), time-decayed,
//!   multi-buffered active set (phonological loop, visuospatial
//!   sketchpad, episodic buffer).
//! - [`semantic`], [`episodic`], [`procedural`], [`prospective`] — the
//!   long-term memory layers, plus [`spatial`] for a path/symbol
//!   hierarchy index.
//! - [`consolidation`] — decides *when* a working-memory item moves out
//!   and *which* long-term layer absorbs it.
//! - [`saliency`] and [`surprise`] — multi-factor importance scoring that
//!   drives attention focus and segmentation boundaries.
//! - [`retrieval`] — two-stage retrieval: coarse spatial filter, then
//!   fine semantic ranking, with [`inhibition`] applied.
//! - [`pipeline`] — orchestrates ingest → segment → consolidate →
//!   saliency → focus as one integrated cycle.
//! - [`central_executive`] — goal hierarchy, attention focus, and
//!   working-memory capacity enforcement.
//!
//! ## Storage
//!
//! This crate has no dependency on a concrete storage engine. Every
//! component above is generic over the [`store::StoreKernel`] trait;
//! concrete backends (e.g. `memory-storage-redb`) implement it directly.
//!
//! ## External collaborators
//!
//! Embedding generation ([`embeddings::Embedder`]) and LLM-backed
//! surprise/contradiction classification ([`llm::LlmClient`]) are
//! pluggable. This crate consumes them through traits and never implements
//! a model itself; every call site that uses an [`llm::LlmClient`] has a
//! documented neutral fallback for when one isn't configured.

pub mod central_executive;
pub mod consolidation;
pub mod embeddings;
pub mod episodic;
pub mod error;
pub mod inhibition;
pub mod llm;
pub mod pipeline;
pub mod procedural;
pub mod prospective;
pub mod retrieval;
pub mod saliency;
pub mod semantic;
pub mod spatial;
pub mod store;
pub mod surprise;
pub mod types;
pub mod wm;

pub use error::{Error, Result};
pub use store::StoreKernel;
pub use types::{Config, MemoryLayer};

/// A cooperative per-project handle bundling a [`StoreKernel`] and an
/// [`embeddings::Embedder`] with the crate's configured defaults — the
/// entry point a host process constructs once at startup and shares
/// across pipeline runs and retrieval queries for one project (§5: the
/// core is single-threaded per project, serialized at the store layer).
pub struct MemorySystem<'a> {
    store: &'a dyn StoreKernel,
    embedder: &'a dyn embeddings::Embedder,
    config: Config,
}

impl<'a> MemorySystem<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel, embedder: &'a dyn embeddings::Embedder, config: Config) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &dyn StoreKernel {
        self.store
    }

    #[must_use]
    pub fn embedder(&self) -> &dyn embeddings::Embedder {
        self.embedder
    }

    /// Run one cycle of the integrated pipeline (C15) for `project_id`.
    ///
    /// # Errors
    /// This never returns `Err` in practice — per-stage failures are
    /// captured in the returned [`pipeline::PipelineReport`].
    pub async fn run_pipeline(
        &self,
        project_id: &str,
        token: &pipeline::CancellationToken,
    ) -> Result<pipeline::PipelineReport> {
        pipeline::run(
            self.store,
            project_id,
            self.embedder,
            &self.config.saliency_weights,
            self.config.surprise_threshold,
            token,
        )
        .await
    }

    /// Run a two-stage spatial → semantic retrieval query (C16).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn query(
        &self,
        project_id: &str,
        query_text: &str,
        spatial_context: Option<&str>,
        max_spatial_depth: usize,
        k: usize,
    ) -> Result<Vec<retrieval::RetrievalResult>> {
        let engine = retrieval::RetrievalEngine::new(
            self.store,
            self.config.retrieval_combined_semantic_weight,
            self.config.inhibition_half_life_s,
        );
        engine
            .query_spatial_semantic(
                project_id,
                query_text,
                self.embedder,
                spatial_context,
                max_spatial_depth,
                k,
            )
            .await
    }

    #[must_use]
    pub fn episodic(&self) -> episodic::EpisodicStore<'_> {
        episodic::EpisodicStore::new(self.store)
    }

    #[must_use]
    pub fn semantic(&self) -> semantic::SemanticStore<'_> {
        semantic::SemanticStore::new(self.store)
    }

    #[must_use]
    pub fn procedural(&self) -> procedural::ProceduralStore<'_> {
        procedural::ProceduralStore::new(self.store)
    }

    #[must_use]
    pub fn prospective(&self) -> prospective::ProspectiveStore<'_> {
        prospective::ProspectiveStore::new(self.store)
    }

    #[must_use]
    pub fn spatial(&self) -> spatial::SpatialIndex<'_> {
        spatial::SpatialIndex::new(self.store)
    }

    #[must_use]
    pub fn goals(&self) -> central_executive::GoalManager<'_> {
        central_executive::GoalManager::new(self.store)
    }

    #[must_use]
    pub fn attention(&self) -> central_executive::AttentionManager<'_> {
        central_executive::AttentionManager::new(self.store)
    }

    #[must_use]
    pub fn phonological_loop(&self) -> wm::PhonologicalLoop<'_> {
        wm::PhonologicalLoop::new(self.store, self.config.wm_phonological_capacity)
    }

    #[must_use]
    pub fn visuospatial_sketchpad(&self) -> wm::VisuospatialSketchpad<'_> {
        wm::VisuospatialSketchpad::new(self.store, self.config.wm_visuospatial_capacity)
    }

    #[must_use]
    pub fn episodic_buffer(&self) -> wm::EpisodicBuffer<'_> {
        wm::EpisodicBuffer::new(self.store, self.config.wm_episodic_buffer_capacity)
    }

    #[must_use]
    pub fn consolidation_router(&self, project_id: impl Into<String>) -> consolidation::ConsolidationRouter<'_> {
        consolidation::ConsolidationRouter::new(self.store, project_id)
    }
}
