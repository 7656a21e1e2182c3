//! Snapshot tests for consolidation feature extraction (§4.11): the
//! 11-float vector is the input to both the heuristic router and the
//! trained classifier, so its layout and values for representative
//! inputs must stay stable across refactors.

use chrono::{DateTime, Utc};
use memory_core::consolidation::features::extract;
use memory_core::types::{Component, ContentType, WorkingMemoryItem};
use std::collections::HashMap;
use uuid::Uuid;

fn fixed_time(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid RFC3339 timestamp")
}

fn item(content: &str, content_type: ContentType, created_at: DateTime<Utc>) -> WorkingMemoryItem {
    WorkingMemoryItem {
        id: Uuid::nil(),
        project_id: "proj-a".to_string(),
        content: content.to_string(),
        content_type,
        component: Component::Phonological,
        activation_level: 0.8,
        created_at,
        last_accessed: created_at,
        decay_rate: 0.01,
        importance: 0.6,
        embedding: None,
        metadata: HashMap::new(),
    }
}

#[test]
fn temporal_sentence_feature_vector() {
    let created_at = fixed_time("2026-01-01T00:00:00Z");
    let now = fixed_time("2026-01-01T00:05:00Z");
    let wm_item = item(
        "yesterday I reviewed the auth.rs file",
        ContentType::Verbal,
        created_at,
    );
    insta::assert_debug_snapshot!(extract(&wm_item, now), @r"
    [
        37.0,
        1.0,
        0.0,
        0.8,
        0.6,
        300.0,
        1.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]
    ");
}

#[test]
fn future_action_sentence_feature_vector() {
    let created_at = fixed_time("2026-01-01T00:00:00Z");
    let now = fixed_time("2026-01-01T00:00:30Z");
    let wm_item = item("tomorrow I will deploy the release", ContentType::Verbal, created_at);
    insta::assert_debug_snapshot!(extract(&wm_item, now), @r"
    [
        34.0,
        1.0,
        0.0,
        0.8,
        0.6,
        30.0,
        1.0,
        1.0,
        1.0,
        0.0,
        0.0,
    ]
    ");
}

#[test]
fn plain_spatial_fact_feature_vector() {
    let created_at = fixed_time("2026-01-01T00:00:00Z");
    let now = fixed_time("2026-01-01T01:00:00Z");
    let wm_item = item("the config lives under /etc/app", ContentType::Spatial, created_at);
    insta::assert_debug_snapshot!(extract(&wm_item, now), @r"
    [
        31.0,
        0.0,
        1.0,
        0.8,
        0.6,
        3600.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]
    ");
}
