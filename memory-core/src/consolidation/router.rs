//! Consolidation router (C14): decides which long-term layer a
//! working-memory item graduates into, and atomically performs the move.

use super::features::extract;
use crate::error::{Error, Result};
use crate::store::StoreKernel;
use crate::types::constants::{
    has_action_verbs, has_future_markers, has_temporal_markers,
};
use crate::types::{ConsolidationRoute, MemoryLayer, Priority, TaskStatus, WorkingMemoryItem};
use chrono::Utc;
use uuid::Uuid;

/// Confidence assigned to a heuristic-fallback routing decision (§4.11).
pub const HEURISTIC_CONFIDENCE: f32 = 0.6;

/// Minimum count of correctly-labeled routes before the tabular
/// classifier is considered trained (§4.11).
pub const MIN_TRAINING_EXAMPLES: usize = 10;

/// Pending-feedback count above which a retrain is triggered lazily (§4.11).
pub const RETRAIN_FEEDBACK_THRESHOLD: usize = 10;

/// Heuristic fallback route, authoritative order temporal → procedural →
/// prospective → semantic (§4.11, and REDESIGN FLAGS resolution of the
/// donor's order-dependent last-match-wins behavior).
#[must_use]
pub fn heuristic_route(content: &str) -> MemoryLayer {
    if has_temporal_markers(content) {
        MemoryLayer::Episodic
    } else if has_action_verbs(content) {
        MemoryLayer::Procedural
    } else if has_future_markers(content) {
        MemoryLayer::Prospective
    } else {
        MemoryLayer::Semantic
    }
}

/// A minimal online-trainable tabular classifier over the 11-feature
/// vector. Supports partial predict (falls back to the heuristic until
/// enough positive examples accumulate) and retrain-on-demand, per §4.11's
/// "random-forest-equivalent; implementer may choose" latitude — this
/// crate's implementation is a per-class running centroid in feature
/// space, nearest-centroid classified.
#[derive(Debug, Default, Clone)]
pub struct TabularClassifier {
    centroids: Vec<(MemoryLayer, [f32; 11], usize)>,
}

impl TabularClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.centroids.iter().map(|(_, _, n)| n).sum::<usize>() >= MIN_TRAINING_EXAMPLES
    }

    /// Fold a labeled example into its class centroid.
    pub fn train(&mut self, features: [f32; 11], label: MemoryLayer) {
        if let Some(entry) = self.centroids.iter_mut().find(|(layer, _, _)| *layer == label) {
            let (_, centroid, count) = entry;
            let n = *count as f32;
            for i in 0..11 {
                centroid[i] = (centroid[i] * n + features[i]) / (n + 1.0);
            }
            *count += 1;
        } else {
            self.centroids.push((label, features, 1));
        }
    }

    /// Predict by nearest centroid (squared Euclidean distance). Returns
    /// `None` if untrained.
    #[must_use]
    pub fn predict(&self, features: &[f32; 11]) -> Option<(MemoryLayer, f32)> {
        if !self.is_trained() {
            return None;
        }
        self.centroids
            .iter()
            .map(|(layer, centroid, _)| {
                let dist_sq: f32 = features
                    .iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                (*layer, dist_sq)
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(layer, dist_sq)| (layer, 1.0 / (1.0 + dist_sq.sqrt())))
    }
}

/// Routes working-memory items to a long-term layer and performs the
/// atomic consolidation move.
pub struct ConsolidationRouter<'a> {
    store: &'a dyn StoreKernel,
    project_id: String,
    classifier: TabularClassifier,
    pending_feedback: usize,
}

impl<'a> ConsolidationRouter<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel, project_id: impl Into<String>) -> Self {
        Self {
            store,
            project_id: project_id.into(),
            classifier: TabularClassifier::new(),
            pending_feedback: 0,
        }
    }

    /// Decide a target layer and confidence for `item`, preferring the
    /// trained classifier and falling back to the heuristic.
    #[must_use]
    pub fn route(&self, item: &WorkingMemoryItem) -> (MemoryLayer, f32) {
        let features = extract(item, Utc::now());
        self.classifier
            .predict(&features)
            .unwrap_or_else(|| (heuristic_route(&item.content), HEURISTIC_CONFIDENCE))
    }

    /// [`Self::route`], additionally logging the decision as a
    /// [`ConsolidationRoute`] training-log row so a later
    /// [`Self::provide_feedback`] call can reference it by id.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn route_and_log(
        &self,
        item: &WorkingMemoryItem,
    ) -> Result<(Uuid, MemoryLayer, f32)> {
        let features = extract(item, Utc::now());
        let (target, confidence) = self
            .classifier
            .predict(&features)
            .unwrap_or_else(|| (heuristic_route(&item.content), HEURISTIC_CONFIDENCE));

        let route_id = Uuid::new_v4();
        let route = ConsolidationRoute {
            id: route_id,
            project_id: item.project_id.clone(),
            wm_id: item.id,
            target_layer: target,
            confidence,
            features,
            was_correct: None,
            routed_at: Utc::now(),
        };
        self.store.insert_consolidation_route(&route).await?;
        Ok((route_id, target, confidence))
    }

    /// [`Self::route_and_log`] over every item in `items`, in order.
    /// A failure partway through stops the batch and returns the error;
    /// already-logged routes before the failing item are not rolled back
    /// (each is its own independent log insert, not a single transaction).
    ///
    /// # Errors
    /// Returns an error if any underlying store call fails.
    pub async fn route_batch(
        &self,
        items: &[WorkingMemoryItem],
    ) -> Result<Vec<(Uuid, MemoryLayer, f32)>> {
        let mut routes = Vec::with_capacity(items.len());
        for item in items {
            routes.push(self.route_and_log(item).await?);
        }
        Ok(routes)
    }

    /// Log a corrected example; retraining is triggered lazily once
    /// `pending_feedback` exceeds [`RETRAIN_FEEDBACK_THRESHOLD`].
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn provide_feedback(
        &mut self,
        route_id: Uuid,
        was_correct: bool,
        correct_layer: Option<MemoryLayer>,
    ) -> Result<()> {
        let routes = self
            .store
            .get_recent_consolidation_routes(&self.project_id, usize::MAX)
            .await?;
        let Some(route) = routes.into_iter().find(|r| r.id == route_id) else {
            return Err(Error::NotFound(route_id));
        };

        if was_correct {
            self.classifier.train(route.features, route.target_layer);
        } else if let Some(layer) = correct_layer {
            self.classifier.train(route.features, layer);
        }

        self.pending_feedback += 1;
        if self.pending_feedback > RETRAIN_FEEDBACK_THRESHOLD {
            self.retrain().await?;
            self.pending_feedback = 0;
        }
        Ok(())
    }

    /// Retrain the classifier from the router's own history of
    /// `was_correct == true` records.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn retrain(&mut self) -> Result<()> {
        self.classifier = TabularClassifier::new();
        for route in self
            .store
            .get_recent_consolidation_routes(&self.project_id, usize::MAX)
            .await?
        {
            if route.was_correct == Some(true) {
                self.classifier.train(route.features, route.target_layer);
            }
        }
        Ok(())
    }

    /// Atomically move `item` out of working memory and into `target`'s
    /// table, with a `wm_id` lineage pointer back to the item, then delete
    /// the WM row — all in one transaction (§4.11). An observer never sees
    /// the item in both working memory and its target layer.
    ///
    /// # Errors
    /// Returns an error if either write fails; both are rolled back together.
    pub async fn consolidate_item(
        &self,
        item: &WorkingMemoryItem,
        target: MemoryLayer,
    ) -> Result<()> {
        let item_id = item.id;
        match target {
            MemoryLayer::Semantic => {
                let record = crate::types::SemanticRecord {
                    id: Uuid::new_v4(),
                    project_id: item.project_id.clone(),
                    content: item.content.clone(),
                    embedding: item.embedding.clone().unwrap_or_default(),
                    memory_type: target.as_str().to_string(),
                    tags: Vec::new(),
                    created_at: Utc::now(),
                    access_count: 0,
                    usefulness_score: item.importance,
                    active: true,
                    wm_id: Some(item_id),
                };
                self.store
                    .transaction(Box::new(move |txn| {
                        txn.put_semantic_record(&record)?;
                        txn.remove_wm_item(item_id)?;
                        Ok(())
                    }))
                    .await
            }
            MemoryLayer::Episodic => {
                let event = crate::types::Event {
                    id: Uuid::new_v4(),
                    project_id: item.project_id.clone(),
                    session_id: None,
                    timestamp: item.created_at,
                    event_type: "consolidated_memory".to_string(),
                    content: item.content.clone(),
                    context: crate::types::EventContext::default(),
                    embedding: item.embedding.clone(),
                    consolidated: true,
                    wm_id: Some(item_id),
                };
                self.store
                    .transaction(Box::new(move |txn| {
                        txn.put_event(&event)?;
                        txn.remove_wm_item(item_id)?;
                        Ok(())
                    }))
                    .await
            }
            MemoryLayer::Procedural => {
                let template = crate::types::ProceduralTemplate {
                    id: Uuid::new_v4(),
                    project_id: item.project_id.clone(),
                    name: item.content.chars().take(64).collect(),
                    category: "consolidated".to_string(),
                    template_body: item.content.clone(),
                    frequency: 1,
                    metadata: {
                        let mut m = std::collections::HashMap::new();
                        m.insert("wm_id".to_string(), item_id.to_string());
                        m
                    },
                    created_at: Utc::now(),
                    wm_id: Some(item_id),
                };
                self.store
                    .transaction(Box::new(move |txn| {
                        txn.put_procedural_template(&template)?;
                        txn.remove_wm_item(item_id)?;
                        Ok(())
                    }))
                    .await
            }
            MemoryLayer::Prospective => {
                let task = crate::types::ProspectiveTask {
                    id: Uuid::new_v4(),
                    project_id: item.project_id.clone(),
                    content: item.content.clone(),
                    active_form: item.content.clone(),
                    priority: Priority::Med,
                    due: None,
                    status: TaskStatus::Pending,
                    activation_tag: None,
                    created_at: Utc::now(),
                    wm_id: Some(item_id),
                };
                self.store
                    .transaction(Box::new(move |txn| {
                        txn.put_prospective_task(&task)?;
                        txn.remove_wm_item(item_id)?;
                        Ok(())
                    }))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_order_is_temporal_first() {
        assert_eq!(
            heuristic_route("yesterday I will deploy the release"),
            MemoryLayer::Episodic
        );
    }

    #[test]
    fn heuristic_falls_through_to_semantic() {
        assert_eq!(heuristic_route("the sky is blue"), MemoryLayer::Semantic);
    }

    #[test]
    fn untrained_classifier_predicts_none() {
        let c = TabularClassifier::new();
        assert!(c.predict(&[0.0; 11]).is_none());
    }
}
