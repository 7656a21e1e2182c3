//! # Test Utilities
//!
//! Shared test fixtures for the cognitive memory substrate and its
//! storage backends.
//!
//! Provides:
//! - A deterministic mock embedder and mock LLM client
//! - Entity builders (events, goals, working-memory items, semantic
//!   records, prospective tasks)
//! - Temp-dir helpers for on-disk store tests

use chrono::Utc;
use memory_core::types::{
    Component, ContentType, Event, EventContext, Goal, GoalStatus, GoalType, ProspectiveTask,
    SemanticRecord, TaskStatus, WorkingMemoryItem,
};
pub use memory_core::embeddings::mock::MockEmbedder;
pub use memory_core::llm::mock::MockLlmClient;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// A fresh, never-touched redb file path inside a process-scoped temp
/// directory. Keeping the `TempDir` alive for the test's duration is the
/// caller's responsibility; dropping it deletes the file.
#[must_use]
pub fn temp_db_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("memory.redb");
    (dir, path)
}

/// Build a minimal episodic event with no embedding.
#[must_use]
pub fn sample_event(project_id: &str, content: &str) -> Event {
    Event {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        session_id: None,
        timestamp: Utc::now(),
        event_type: "agent_action".to_string(),
        content: content.to_string(),
        context: EventContext::default(),
        embedding: None,
        consolidated: false,
        wm_id: None,
    }
}

/// Build an episodic event carrying `embedding` and an explicit `cwd`,
/// for retrieval and spatial-index tests.
#[must_use]
pub fn sample_event_with_embedding(project_id: &str, content: &str, embedding: Vec<f32>, cwd: &str) -> Event {
    let mut event = sample_event(project_id, content);
    event.embedding = Some(embedding);
    event.context.cwd = Some(cwd.to_string());
    event
}

/// Build a top-level active goal.
#[must_use]
pub fn sample_goal(project_id: &str, goal_text: &str) -> Goal {
    Goal {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        goal_text: goal_text.to_string(),
        goal_type: GoalType::Primary,
        parent_goal_id: None,
        priority: 5,
        status: GoalStatus::Active,
        progress: 0.0,
        deadline: None,
        created_at: Utc::now(),
        embedding: None,
    }
}

/// Build a semantic record active in `project_id`.
#[must_use]
pub fn sample_semantic_record(project_id: &str, content: &str, embedding: Vec<f32>) -> SemanticRecord {
    SemanticRecord {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        content: content.to_string(),
        embedding,
        memory_type: "fact".to_string(),
        tags: Vec::new(),
        created_at: Utc::now(),
        access_count: 0,
        usefulness_score: 0.5,
        active: true,
        wm_id: None,
    }
}

/// Build a working-memory item in the phonological loop with moderate
/// importance and decay.
#[must_use]
pub fn sample_wm_item(project_id: &str, content: &str) -> WorkingMemoryItem {
    WorkingMemoryItem {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        content: content.to_string(),
        content_type: ContentType::Verbal,
        component: Component::Phonological,
        activation_level: 1.0,
        created_at: Utc::now(),
        last_accessed: Utc::now(),
        decay_rate: 0.01,
        importance: 0.5,
        embedding: None,
        metadata: HashMap::new(),
    }
}

/// Build a pending prospective task with no due date or activation tag.
#[must_use]
pub fn sample_prospective_task(project_id: &str, content: &str) -> ProspectiveTask {
    ProspectiveTask {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        content: content.to_string(),
        active_form: content.to_string(),
        priority: memory_core::types::Priority::Med,
        due: None,
        status: TaskStatus::Pending,
        activation_tag: None,
        created_at: Utc::now(),
        wm_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_event_has_no_embedding() {
        let e = sample_event("proj", "did a thing");
        assert!(e.embedding.is_none());
        assert!(!e.consolidated);
    }

    #[test]
    fn sample_goal_is_active_primary() {
        let g = sample_goal("proj", "ship the feature");
        assert_eq!(g.goal_type, GoalType::Primary);
        assert_eq!(g.status, GoalStatus::Active);
    }
}
