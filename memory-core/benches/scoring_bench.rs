//! Benchmarks for the embedding and saliency primitives retrieval and
//! consolidation scoring are built on.
//!
//! Run with: cargo bench --package memory-core

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_core::embeddings::cosine_similarity;
use memory_core::saliency::{recency, saliency};
use memory_core::types::SaliencyWeights;

fn sample_vector(dim: usize, seed: u32) -> Vec<f32> {
    (0..dim)
        .map(|i| ((i as u32).wrapping_mul(seed).wrapping_add(1) % 1000) as f32 / 1000.0)
        .collect()
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_similarity");
    for dim in &[64, 384, 1536] {
        let a = sample_vector(*dim, 7);
        let b = sample_vector(*dim, 13);
        group.bench_with_input(BenchmarkId::from_parameter(dim), dim, |bencher, _| {
            bencher.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
        });
    }
    group.finish();
}

fn bench_nearest_neighbor_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_neighbor_scan");
    for count in &[100, 1000, 10000] {
        let query = sample_vector(384, 1);
        let records: Vec<Vec<f32>> = (0..*count).map(|i| sample_vector(384, i + 2)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |bencher, _| {
            bencher.iter(|| {
                let mut scored: Vec<f32> = records
                    .iter()
                    .map(|r| cosine_similarity(black_box(&query), r))
                    .collect();
                scored.sort_by(|a, b| b.partial_cmp(a).unwrap());
                black_box(scored.truncate(5));
            });
        });
    }
    group.finish();
}

fn bench_saliency(c: &mut Criterion) {
    let weights = SaliencyWeights::default();
    let now = Utc::now();
    let created_at = now - chrono::Duration::days(3);
    c.bench_function("saliency_weighted_sum", |b| {
        b.iter(|| {
            let r = recency(black_box(created_at), black_box(now));
            black_box(saliency(&weights, 0.8, r, 0.6, 0.2))
        });
    });
}

criterion_group!(
    benches,
    bench_cosine_similarity,
    bench_nearest_neighbor_scan,
    bench_saliency
);
criterion_main!(benches);
