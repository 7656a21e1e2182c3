//! Property-based tests for the quantified invariants in the decay and
//! saliency scoring functions (bounds and monotonicity hold for every
//! input, not just the fixed cases covered by unit tests).

use memory_core::saliency::{band, frequency, recency, relevance, saliency, surprise, SaliencyBand};
use memory_core::types::SaliencyWeights;
use memory_core::wm::decay::current_activation;
use proptest::prelude::*;

proptest! {
    /// Activation never leaves `[0, a0]` and decreases (or holds) as
    /// elapsed time grows, for any decay rate, importance, or a0 in range.
    #[test]
    fn activation_is_bounded_and_monotonic_in_time(
        a0 in 0.0f32..1.0f32,
        decay_rate in 0.0f32..1.0f32,
        importance in 0.0f32..1.0f32,
        delta_t in 0.0f32..100_000.0f32,
    ) {
        let activation = current_activation(a0, decay_rate, importance, delta_t);
        prop_assert!(activation >= 0.0);
        prop_assert!(activation <= a0 + 1e-6);

        let later = current_activation(a0, decay_rate, importance, delta_t + 1.0);
        prop_assert!(later <= activation + 1e-6);
    }

    /// Higher importance never decays faster than lower importance, all
    /// else equal.
    #[test]
    fn higher_importance_never_decays_faster(
        a0 in 0.01f32..1.0f32,
        decay_rate in 0.01f32..1.0f32,
        delta_t in 1.0f32..10_000.0f32,
        low in 0.0f32..1.0f32,
        high in 0.0f32..1.0f32,
    ) {
        prop_assume!(high >= low);
        let slower = current_activation(a0, decay_rate, high, delta_t);
        let faster = current_activation(a0, decay_rate, low, delta_t);
        prop_assert!(slower >= faster - 1e-6);
    }

    /// `frequency` is always in `[0,1]`.
    #[test]
    fn frequency_is_bounded(access_count in 0u64..10_000, max_access in 0u64..10_000) {
        let f = frequency(access_count, max_access);
        prop_assert!((0.0..=1.0).contains(&f));
    }

    /// `recency` is always in `[0,1]`, and non-negative ages never exceed
    /// a same-instant reading.
    #[test]
    fn recency_is_bounded(age_secs in 0i64..(400 * 86_400)) {
        let now = chrono::Utc::now();
        let created_at = now - chrono::Duration::seconds(age_secs);
        let r = recency(created_at, now);
        prop_assert!((0.0..=1.0).contains(&r));
        prop_assert!(r <= recency(now, now) + 1e-6);
    }

    /// `relevance` is always in `[0,1]` regardless of which inputs are
    /// present.
    #[test]
    fn relevance_is_bounded(
        has_memory in any::<bool>(),
        has_goal in any::<bool>(),
        usefulness in proptest::option::of(0.0f32..1.0f32),
    ) {
        let memory_embedding = if has_memory { Some(vec![1.0f32, 0.0, 0.5]) } else { None };
        let goal_embedding = if has_goal { Some(vec![0.5f32, 1.0, 0.0]) } else { None };
        let r = relevance(memory_embedding.as_deref(), goal_embedding.as_deref(), usefulness);
        prop_assert!((0.0..=1.0).contains(&r));
    }

    /// `surprise` is always in `[0,1]`.
    #[test]
    fn surprise_is_bounded(
        context_len in 0usize..20,
    ) {
        let memory_embedding = vec![0.3f32, 0.7, -0.2];
        let context_embeddings: Vec<Vec<f32>> = (0..context_len)
            .map(|i| vec![(i as f32) / 10.0, 1.0 - (i as f32) / 10.0, 0.1])
            .collect();
        let s = surprise(&memory_embedding, &context_embeddings);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    /// The weighted saliency sum never leaves `[0,1]` for any combination
    /// of subfactor scores and any weight split (including degenerate,
    /// non-normalized weights).
    #[test]
    fn saliency_is_always_bounded(
        frequency_score in 0.0f32..1.0f32,
        recency_score in 0.0f32..1.0f32,
        relevance_score in 0.0f32..1.0f32,
        surprise_score in 0.0f32..1.0f32,
        w_freq in 0.0f32..1.0f32,
        w_rec in 0.0f32..1.0f32,
        w_rel in 0.0f32..1.0f32,
        w_sur in 0.0f32..1.0f32,
    ) {
        let weights = SaliencyWeights {
            frequency: w_freq,
            recency: w_rec,
            relevance: w_rel,
            surprise: w_sur,
        };
        let score = saliency(&weights, frequency_score, recency_score, relevance_score, surprise_score);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// `band`'s three cases partition `[0,1]` with no gap or overlap:
    /// every score maps to exactly one band, consistent with the
    /// documented `>=` boundary convention.
    #[test]
    fn band_partitions_unit_interval(score in 0.0f32..1.0f32) {
        let b = band(score);
        match b {
            SaliencyBand::Primary => prop_assert!(score >= 0.7),
            SaliencyBand::Secondary => prop_assert!((0.4..0.7).contains(&score)),
            SaliencyBand::Background => prop_assert!(score < 0.4),
        }
    }
}
