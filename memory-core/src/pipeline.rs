//! Integrated pipeline (C15): the five-stage consolidation/attention cycle.

use crate::central_executive::AttentionManager;
use crate::consolidation::ConsolidationRouter;
use crate::embeddings::Embedder;
use crate::saliency;
use crate::store::StoreKernel;
use crate::surprise::detect_boundaries;
use crate::types::{Component, FocusType, SaliencyWeights, SurpriseBoundary};
use uuid::Uuid;

/// Max events considered for pairwise surprise per invocation (§4.12).
pub const SURPRISE_EVENT_WINDOW: usize = 100;

/// Max LTM records scored for saliency per invocation (§4.12).
pub const SALIENCY_RECORD_WINDOW: usize = 20;

/// Top-N candidates auto-focused per invocation (§4.12).
pub const AUTO_FOCUS_TOP_N: usize = 5;

/// Structured result of one full pipeline run. Each field captures its
/// stage's own outcome in isolation — a stage failure (logged, not
/// returned) simply leaves its field `None` (§4.12, §5).
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Set once a stage observed the token cancelled; stages before it
    /// already committed whatever they committed.
    pub cancelled: bool,
    pub unprocessed_events: Option<usize>,
    pub surprise_boundaries: Option<Vec<SurpriseBoundary>>,
    pub consolidated_items: Option<usize>,
    pub saliency_scores: Option<Vec<(Uuid, f32)>>,
    pub auto_focused: Option<usize>,
}

/// A cancellation signal checked at stage boundaries (§5). A cancelled
/// stage returns [`StageResult::Cancelled`] without committing any of its
/// own side effects; side effects already committed by earlier stages
/// stand.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Runs the five consolidation stages in order, isolating each stage's
/// failures into the returned [`PipelineReport`] rather than aborting the
/// whole run.
///
/// # Errors
/// This function itself never returns `Err` — per-stage failures are
/// captured in the report. The `Result` wrapper exists for call sites
/// that want `?`-compatible plumbing; it is always `Ok`.
pub async fn run(
    store: &dyn StoreKernel,
    project_id: &str,
    embedder: &dyn Embedder,
    saliency_weights: &SaliencyWeights,
    surprise_threshold: f32,
    token: &CancellationToken,
) -> crate::error::Result<PipelineReport> {
    let mut report = PipelineReport::default();

    // Stage 1: count unprocessed events.
    if token.is_cancelled() {
        report.cancelled = true;
        return Ok(report);
    }
    match store.count_unprocessed_events(project_id).await {
        Ok(n) => report.unprocessed_events = Some(n),
        Err(e) => tracing::warn!(error = %e, "pipeline stage 1 failed"),
    }

    // Stage 2: pairwise surprise over up to 100 most-recent events.
    if token.is_cancelled() {
        report.cancelled = true;
        return Ok(report);
    }
    match store
        .get_recent_events(project_id, SURPRISE_EVENT_WINDOW)
        .await
    {
        Ok(mut events) => {
            events.reverse();
            let pairs: Vec<(Uuid, Option<Vec<f32>>)> =
                events.iter().map(|e| (e.id, e.embedding.clone())).collect();
            report.surprise_boundaries = Some(detect_boundaries(&pairs, surprise_threshold));
        }
        Err(e) => tracing::warn!(error = %e, "pipeline stage 2 failed"),
    }

    // Stage 3: consolidate eligible WM items.
    if token.is_cancelled() {
        report.cancelled = true;
        return Ok(report);
    }
    match consolidate_eligible(store, project_id, embedder).await {
        Ok(n) => report.consolidated_items = Some(n),
        Err(e) => tracing::warn!(error = %e, "pipeline stage 3 failed"),
    }

    // Stage 4: saliency over up to 20 most recent LTM records.
    if token.is_cancelled() {
        report.cancelled = true;
        return Ok(report);
    }
    match score_recent_saliency(store, project_id, saliency_weights).await {
        Ok(scores) => report.saliency_scores = Some(scores),
        Err(e) => tracing::warn!(error = %e, "pipeline stage 4 failed"),
    }

    // Stage 5: auto-focus top 5.
    if token.is_cancelled() {
        report.cancelled = true;
        return Ok(report);
    }
    let scores = report.saliency_scores.clone().unwrap_or_default();
    match auto_focus(store, project_id, &scores).await {
        Ok(n) => report.auto_focused = Some(n),
        Err(e) => tracing::warn!(error = %e, "pipeline stage 5 failed"),
    }

    Ok(report)
}

async fn consolidate_eligible(
    store: &dyn StoreKernel,
    project_id: &str,
    embedder: &dyn Embedder,
) -> crate::error::Result<usize> {
    let router = ConsolidationRouter::new(store, project_id);
    let mut count = 0;
    for component in [
        Component::Phonological,
        Component::Visuospatial,
        Component::EpisodicBuffer,
    ] {
        for item in store.get_wm_items(project_id, component).await? {
            if crate::wm::is_decayed(&item, chrono::Utc::now()) {
                let (target, _confidence) = router.route(&item);
                router.consolidate_item(&item, target).await?;
                count += 1;
            }
        }
    }
    let _ = embedder;
    Ok(count)
}

async fn score_recent_saliency(
    store: &dyn StoreKernel,
    project_id: &str,
    weights: &SaliencyWeights,
) -> crate::error::Result<Vec<(Uuid, f32)>> {
    let records = store
        .get_active_semantic_records(project_id, SALIENCY_RECORD_WINDOW)
        .await?;
    let max_access = records.iter().map(|r| r.access_count).max().unwrap_or(0);
    let now = chrono::Utc::now();

    Ok(records
        .iter()
        .map(|r| {
            let freq = saliency::frequency(r.access_count, max_access);
            let rec = saliency::recency(r.created_at, now);
            let rel = saliency::relevance(Some(&r.embedding), None, Some(r.usefulness_score));
            // No windowed context available at this call site; surprise
            // defaults to "no context" (0.0) per §4.8.
            let sur = 0.0;
            (r.id, saliency::saliency(weights, freq, rec, rel, sur))
        })
        .collect())
}

async fn auto_focus(
    store: &dyn StoreKernel,
    project_id: &str,
    scores: &[(Uuid, f32)],
) -> crate::error::Result<usize> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let targets: Vec<(String, FocusType)> = ranked
        .into_iter()
        .map(|(id, _)| (id.to_string(), FocusType::Memory))
        .collect();

    if targets.is_empty() {
        return Ok(0);
    }
    let manager = AttentionManager::new(store);
    let focused = manager
        .auto_focus_top_memories(project_id, &targets, AUTO_FOCUS_TOP_N)
        .await?;
    Ok(focused.len())
}
