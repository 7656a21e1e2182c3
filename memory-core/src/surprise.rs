//! Surprise segmenter (C12): detects boundaries in an episodic event
//! stream from pairwise embedding dissimilarity.

use crate::embeddings::cosine_similarity;
use crate::types::SurpriseBoundary;
use uuid::Uuid;

/// Per-step surprise `s_i = 1 − ((cos_sim(e_{i−1}, e_i) + 1)/2)` (§4.9).
#[must_use]
pub fn step_surprise(prev: &[f32], curr: &[f32]) -> f32 {
    (1.0 - ((cosine_similarity(prev, curr) + 1.0) / 2.0)).clamp(0.0, 1.0)
}

/// Walk an ordered stream of `(event_id, embedding)` pairs and emit a
/// [`SurpriseBoundary`] wherever `s_i > threshold`. Events with a missing
/// embedding (on either side of the pair) contribute no boundary rather
/// than erroring (§4.9).
#[must_use]
pub fn detect_boundaries(
    events: &[(Uuid, Option<Vec<f32>>)],
    threshold: f32,
) -> Vec<SurpriseBoundary> {
    let mut boundaries = Vec::new();
    for pair in events.windows(2) {
        let [(_, prev_emb), (id, curr_emb)] = pair else {
            continue;
        };
        let (Some(prev), Some(curr)) = (prev_emb, curr_emb) else {
            continue;
        };
        let s = step_surprise(prev, curr);
        if s > threshold {
            boundaries.push(SurpriseBoundary {
                event_id: *id,
                surprise: s,
            });
        }
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_embeddings_are_not_surprising() {
        let v = vec![1.0, 0.0, 0.0];
        assert!(step_surprise(&v, &v) < 1e-6);
    }

    #[test]
    fn orthogonal_embeddings_are_maximally_surprising() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((step_surprise(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn missing_embedding_emits_no_boundary() {
        let id1 = Uuid::new_v4();
        let id2 = Uuid::new_v4();
        let events = vec![(id1, None), (id2, Some(vec![1.0, 0.0]))];
        assert!(detect_boundaries(&events, 0.5).is_empty());
    }

    #[test]
    fn dissimilar_pair_crosses_threshold() {
        let id1 = Uuid::new_v4();
        let id2 = Uuid::new_v4();
        let events = vec![
            (id1, Some(vec![1.0, 0.0])),
            (id2, Some(vec![-1.0, 0.0])),
        ];
        let boundaries = detect_boundaries(&events, 0.5);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].event_id, id2);
    }
}
