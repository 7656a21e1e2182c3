//! Integration tests for the redb store kernel backend.

use chrono::Utc;
use memory_core::consolidation::router::ConsolidationRouter;
use memory_core::error::Error;
use memory_core::semantic::SemanticStore;
use memory_core::spatial::SpatialIndex;
use memory_core::store::StoreKernel;
use memory_core::types::{Component, GoalStatus, NodeType};
use memory_storage_redb::RedbStore;
use memory_test_utils::{sample_event, sample_goal, sample_semantic_record, sample_wm_item, MockLlmClient};

async fn test_store() -> (RedbStore, tempfile::TempDir) {
    let (dir, path) = memory_test_utils::temp_db_path();
    let store = RedbStore::open(&path, 4, 1800).await.unwrap();
    (store, dir)
}

#[tokio::test]
async fn record_and_fetch_event() {
    let (store, _dir) = test_store().await;
    let event = sample_event("proj-a", "did a thing");

    store.record_event(&event).await.unwrap();
    let fetched = store.get_event(event.id).await.unwrap().unwrap();

    assert_eq!(fetched.id, event.id);
    assert_eq!(fetched.content, "did a thing");
    assert!(!fetched.consolidated);
}

#[tokio::test]
async fn recent_events_are_sorted_descending() {
    let (store, _dir) = test_store().await;
    let mut first = sample_event("proj-a", "first");
    first.timestamp = Utc::now() - chrono::Duration::seconds(10);
    let second = sample_event("proj-a", "second");

    store.record_event(&first).await.unwrap();
    store.record_event(&second).await.unwrap();

    let recent = store.get_recent_events("proj-a", 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].content, "second");
    assert_eq!(recent[1].content, "first");
}

#[tokio::test]
async fn events_are_isolated_by_project() {
    let (store, _dir) = test_store().await;
    store.record_event(&sample_event("proj-a", "a")).await.unwrap();
    store.record_event(&sample_event("proj-b", "b")).await.unwrap();

    let a_events = store.get_recent_events("proj-a", 10).await.unwrap();
    assert_eq!(a_events.len(), 1);
    assert_eq!(a_events[0].content, "a");
}

#[tokio::test]
async fn mark_event_consolidated_is_idempotent() {
    let (store, _dir) = test_store().await;
    let event = sample_event("proj-a", "x");
    store.record_event(&event).await.unwrap();

    store.mark_event_consolidated(event.id).await.unwrap();
    store.mark_event_consolidated(event.id).await.unwrap();

    let fetched = store.get_event(event.id).await.unwrap().unwrap();
    assert!(fetched.consolidated);
}

#[tokio::test]
async fn record_event_rejects_mismatched_embedding_dimension() {
    let (store, _dir) = test_store().await;
    let mut event = sample_event("proj-a", "x");
    event.embedding = Some(vec![0.1, 0.2]); // store is configured for dim 4

    let err = store.record_event(&event).await.unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch(_)));
}

#[tokio::test]
async fn semantic_record_roundtrip_and_active_filter() {
    let (store, _dir) = test_store().await;
    let record = sample_semantic_record("proj-a", "rust is memory safe", vec![0.0; 4]);
    let id = store.upsert_semantic_record(&record).await.unwrap();

    let active = store.get_active_semantic_records("proj-a", 10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);

    store.set_semantic_active(id, false).await.unwrap();
    let active = store.get_active_semantic_records("proj-a", 10).await.unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn wm_items_scoped_by_component() {
    let (store, _dir) = test_store().await;
    let item = sample_wm_item("proj-a", "holding this");
    store.upsert_wm_item(&item).await.unwrap();

    let phono = store.get_wm_items("proj-a", Component::Phonological).await.unwrap();
    assert_eq!(phono.len(), 1);

    let visuo = store.get_wm_items("proj-a", Component::Visuospatial).await.unwrap();
    assert!(visuo.is_empty());

    store.remove_wm_item(item.id).await.unwrap();
    let phono = store.get_wm_items("proj-a", Component::Phonological).await.unwrap();
    assert!(phono.is_empty());
}

#[tokio::test]
async fn goal_hierarchy_queries() {
    let (store, _dir) = test_store().await;
    let parent = sample_goal("proj-a", "ship the feature");
    store.upsert_goal(&parent).await.unwrap();

    let mut child = sample_goal("proj-a", "write tests");
    child.parent_goal_id = Some(parent.id);
    store.upsert_goal(&child).await.unwrap();

    let active = store.get_active_goals("proj-a").await.unwrap();
    assert_eq!(active.len(), 2);

    let children = store.get_child_goals("proj-a", Some(parent.id)).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, child.id);

    let top_level = store.get_child_goals("proj-a", None).await.unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].id, parent.id);
}

#[tokio::test]
async fn goal_not_found_on_missing_id() {
    let (store, _dir) = test_store().await;
    let missing = uuid::Uuid::new_v4();
    assert!(store.get_goal(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn attention_focus_end_primary() {
    let (store, _dir) = test_store().await;
    let focus = memory_core::types::AttentionFocus {
        id: uuid::Uuid::new_v4(),
        project_id: "proj-a".to_string(),
        focus_target: "auth.rs".to_string(),
        focus_type: memory_core::types::FocusType::Primary,
        weight: 1.0,
        started_at: Utc::now(),
        ended_at: None,
        transition_type: memory_core::types::TransitionType::Manual,
        previous_focus_id: None,
    };
    store.upsert_attention_focus(&focus).await.unwrap();

    let active = store.get_active_focuses("proj-a").await.unwrap();
    assert_eq!(active.len(), 1);

    store.end_primary_focus("proj-a").await.unwrap();
    let active = store.get_active_focuses("proj-a").await.unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn spatial_node_upsert_is_idempotent() {
    let (store, _dir) = test_store().await;
    let node = memory_core::types::SpatialNode {
        project_id: "proj-a".to_string(),
        name: "auth.rs".to_string(),
        full_path: "/src/auth.rs".to_string(),
        depth: 2,
        parent_path: Some("/src".to_string()),
        node_type: memory_core::types::NodeType::File,
        language: Some("rust".to_string()),
        symbol_kind: None,
    };
    store.upsert_spatial_node(&node).await.unwrap();
    store.upsert_spatial_node(&node).await.unwrap();

    let found = store.find_spatial_node_by_path("proj-a", "/src/auth.rs").await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn inhibition_gc_removes_decayed_records() {
    let (store, _dir) = test_store().await;
    let target = uuid::Uuid::new_v4();
    let record = memory_core::types::InhibitionRecord {
        id: uuid::Uuid::new_v4(),
        project_id: "proj-a".to_string(),
        memory_id: target,
        memory_layer: memory_core::types::MemoryLayer::Semantic,
        inhibition_strength: 0.01,
        inhibition_type: memory_core::types::InhibitionType::Proactive,
        reason: None,
        inhibited_at: Utc::now() - chrono::Duration::days(30),
        expires_at: None,
    };
    store.insert_inhibition_record(&record).await.unwrap();

    let removed = store.gc_inhibition_records(0.05).await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.get_inhibition_records(target).await.unwrap().is_empty());
}

#[tokio::test]
async fn goal_status_defaults_active() {
    let (store, _dir) = test_store().await;
    let goal = sample_goal("proj-a", "do the thing");
    store.upsert_goal(&goal).await.unwrap();
    let fetched = store.get_goal(goal.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, GoalStatus::Active);
}

#[tokio::test]
async fn create_or_merge_without_llm_falls_back_to_dedup() {
    let (store, _dir) = test_store().await;
    let semantic = SemanticStore::new(&store);
    let record = sample_semantic_record("proj-a", "rust is memory safe", vec![0.0; 4]);

    let first_id = semantic.create_or_merge(record.clone(), None).await.unwrap();
    let duplicate = sample_semantic_record("proj-a", "rust is memory safe", vec![0.0; 4]);
    let second_id = semantic.create_or_merge(duplicate, None).await.unwrap();

    assert_eq!(first_id, second_id);
    let active = store.get_active_semantic_records("proj-a", 10).await.unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn create_or_merge_retires_contradicted_record_on_yes() {
    let (store, _dir) = test_store().await;
    let semantic = SemanticStore::new(&store);
    let old = sample_semantic_record("proj-a", "the deploy is scheduled for Monday", vec![0.1; 4]);
    let old_id = semantic.create_or_merge(old, None).await.unwrap();

    let llm = MockLlmClient::constant(format!("YES: {old_id}"));
    let new_record = sample_semantic_record("proj-a", "the deploy is scheduled for Friday", vec![0.1; 4]);
    let new_id = semantic.create_or_merge(new_record, Some(&llm)).await.unwrap();

    assert_ne!(new_id, old_id);
    let active = store.get_active_semantic_records("proj-a", 10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, new_id);
}

#[tokio::test]
async fn create_or_merge_keeps_both_records_on_no_contradiction() {
    let (store, _dir) = test_store().await;
    let semantic = SemanticStore::new(&store);
    let first = sample_semantic_record("proj-a", "the service runs on port 8080", vec![0.2; 4]);
    semantic.create_or_merge(first, None).await.unwrap();

    let llm = MockLlmClient::constant("NO");
    let second = sample_semantic_record("proj-a", "the database runs on port 5432", vec![0.3; 4]);
    semantic.create_or_merge(second, Some(&llm)).await.unwrap();

    let active = store.get_active_semantic_records("proj-a", 10).await.unwrap();
    assert_eq!(active.len(), 2);
}

#[tokio::test]
async fn route_batch_logs_one_route_per_item() {
    let (store, _dir) = test_store().await;
    let router = ConsolidationRouter::new(&store, "proj-a");
    let items = vec![
        sample_wm_item("proj-a", "yesterday I reviewed the auth.rs file"),
        sample_wm_item("proj-a", "the sky is blue"),
        sample_wm_item("proj-a", "tomorrow I will deploy the release"),
    ];

    let routes = router.route_batch(&items).await.unwrap();

    assert_eq!(routes.len(), items.len());
    let logged = store.get_recent_consolidation_routes("proj-a", 10).await.unwrap();
    assert_eq!(logged.len(), items.len());
    for (route_id, _, _) in &routes {
        assert!(logged.iter().any(|r| r.id == *route_id));
    }
}

#[tokio::test]
async fn index_path_attaches_symbol_kind_to_leaf_only() {
    let (store, _dir) = test_store().await;
    let spatial = SpatialIndex::new(&store);

    spatial
        .index_path(
            "proj-a",
            "src/auth.rs",
            NodeType::Function,
            Some("function".to_string()),
        )
        .await
        .unwrap();

    let leaf = store
        .find_spatial_node_by_path("proj-a", "src/auth.rs")
        .await
        .unwrap()
        .expect("leaf node indexed");
    assert_eq!(leaf.symbol_kind.as_deref(), Some("function"));

    let dir = store
        .find_spatial_node_by_path("proj-a", "src")
        .await
        .unwrap()
        .expect("ancestor directory indexed");
    assert_eq!(dir.symbol_kind, None);
}
