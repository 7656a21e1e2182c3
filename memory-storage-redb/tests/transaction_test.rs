//! Atomicity of the consolidation move: a working-memory item's removal
//! and its target long-term record's insertion land in the same redb
//! commit.

use memory_core::store::{StoreKernel, Transaction};
use memory_core::types::SemanticRecord;
use memory_storage_redb::RedbStore;
use memory_test_utils::sample_wm_item;

#[tokio::test]
async fn consolidation_move_commits_atomically() {
    let (_dir, path) = memory_test_utils::temp_db_path();
    let store = RedbStore::open(&path, 4, 1800).await.unwrap();

    let wm_item = sample_wm_item("proj-a", "rust is memory safe");
    store.upsert_wm_item(&wm_item).await.unwrap();

    let record = SemanticRecord {
        id: uuid::Uuid::new_v4(),
        project_id: "proj-a".to_string(),
        content: wm_item.content.clone(),
        embedding: vec![0.0; 4],
        memory_type: "fact".to_string(),
        tags: Vec::new(),
        created_at: chrono::Utc::now(),
        access_count: 0,
        usefulness_score: 0.5,
        active: true,
        wm_id: Some(wm_item.id),
    };

    let wm_id = wm_item.id;
    let record_clone = record.clone();
    store
        .transaction(Box::new(move |txn: &dyn Transaction| {
            txn.put_semantic_record(&record_clone)?;
            txn.remove_wm_item(wm_id)?;
            Ok(())
        }))
        .await
        .unwrap();

    assert!(store.get_wm_items("proj-a", wm_item.component).await.unwrap().is_empty());
    let active = store.get_active_semantic_records("proj-a", 10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, record.id);
}
