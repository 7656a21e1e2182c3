//! Benchmarks for two-stage spatial/semantic retrieval (C16) against a
//! real redb-backed store.
//!
//! Run with: cargo bench --package memory-storage-redb

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_core::retrieval::RetrievalEngine;
use memory_core::store::StoreKernel;
use memory_storage_redb::RedbStore;
use memory_test_utils::{sample_event_with_embedding, MockEmbedder};

const DIM: usize = 384;

async fn seeded_store(event_count: usize) -> (RedbStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bench.redb");
    let store = RedbStore::open(&path, DIM, 1800).await.expect("open store");

    for i in 0..event_count {
        let embedding: Vec<f32> = (0..DIM).map(|d| ((d + i) % 997) as f32 / 997.0).collect();
        let event = sample_event_with_embedding("bench-project", "some event content", embedding, "/src/main.rs");
        store.record_event(&event).await.expect("record event");
    }

    (store, dir)
}

fn bench_two_stage_query(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("build tokio runtime");
    let mut group = c.benchmark_group("two_stage_retrieval");

    for count in &[100usize, 1000] {
        let (store, _dir) = runtime.block_on(seeded_store(*count));
        let embedder = MockEmbedder::new(DIM);
        let engine = RetrievalEngine::new(&store, 0.6, 1800);

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.to_async(&runtime).iter(|| async {
                let results = engine
                    .query_spatial_semantic(
                        black_box("bench-project"),
                        black_box("some event content"),
                        &embedder,
                        Some("/src"),
                        2,
                        5,
                    )
                    .await
                    .expect("query");
                black_box(results);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_two_stage_query);
criterion_main!(benches);
