use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::enums::{
    Component, ContentType, EventRelationType, FocusType, GoalStatus, GoalType, InhibitionType,
    MemoryLayer, NodeType, Priority, RelationType, TaskStatus, TransitionType,
};

/// A unit-normalized embedding vector of the project's configured dimension.
pub type Embedding = Vec<f32>;

/// Typed context carried alongside an episodic event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventContext {
    pub cwd: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// An immutable episodic event. Never updated or re-timestamped once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub project_id: String,
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub content: String,
    pub context: EventContext,
    pub embedding: Option<Embedding>,
    /// Whether this event has already been folded into a long-term layer
    /// by the consolidation pipeline (C15).
    #[serde(default)]
    pub consolidated: bool,
    /// Links back to the working-memory item that produced this event,
    /// when created by consolidation into the episodic layer rather than
    /// a direct `record_event` call.
    #[serde(default)]
    pub wm_id: Option<Uuid>,
}

/// A deduplicated fact/concept record produced by consolidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticRecord {
    pub id: Uuid,
    pub project_id: String,
    pub content: String,
    pub embedding: Embedding,
    pub memory_type: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
    pub usefulness_score: f32,
    /// True once superseded by a contradiction-resolution merge.
    pub active: bool,
    /// Links back to the working-memory item that produced this record,
    /// when created by consolidation rather than a direct write.
    pub wm_id: Option<Uuid>,
}

/// A reusable workflow template or learned pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProceduralTemplate {
    pub id: Uuid,
    pub project_id: String,
    pub name: String,
    pub category: String,
    pub template_body: String,
    /// Monotonically non-decreasing usage count.
    pub frequency: u64,
    pub metadata: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub wm_id: Option<Uuid>,
}

/// A future/reminder task with an activation condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectiveTask {
    pub id: Uuid,
    pub project_id: String,
    pub content: String,
    pub active_form: String,
    pub priority: Priority,
    pub due: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    /// Tag that, when matched by a query, activates this reminder even
    /// without a due date.
    pub activation_tag: Option<String>,
    pub created_at: DateTime<Utc>,
    pub wm_id: Option<Uuid>,
}

impl ProspectiveTask {
    /// Whether this task's activation condition is currently met: either
    /// its due date has passed, or `tag` matches its `activation_tag`.
    #[must_use]
    pub fn is_activated(&self, now: DateTime<Utc>, tag: Option<&str>) -> bool {
        if let Some(due) = self.due {
            if now >= due {
                return true;
            }
        }
        if let (Some(want), Some(have)) = (tag, self.activation_tag.as_deref()) {
            if want == have {
                return true;
            }
        }
        false
    }
}

/// A capacity-bounded, time-decayed item living in one working-memory buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemoryItem {
    pub id: Uuid,
    pub project_id: String,
    pub content: String,
    pub content_type: ContentType,
    pub component: Component,
    pub activation_level: f32,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub decay_rate: f32,
    pub importance: f32,
    pub embedding: Option<Embedding>,
    pub metadata: HashMap<String, String>,
}

/// A node in the goal hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub project_id: String,
    pub goal_text: String,
    pub goal_type: GoalType,
    pub parent_goal_id: Option<Uuid>,
    pub priority: u8,
    pub status: GoalStatus,
    pub progress: f32,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub embedding: Option<Embedding>,
}

/// A node in the hierarchical path/symbol graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialNode {
    pub project_id: String,
    pub name: String,
    pub full_path: String,
    pub depth: u32,
    pub parent_path: Option<String>,
    pub node_type: NodeType,
    pub language: Option<String>,
    pub symbol_kind: Option<String>,
}

/// A directed relation between two spatial nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialRelation {
    pub from_path: String,
    pub to_path: String,
    pub project_id: String,
    pub relation_type: RelationType,
    pub strength: f32,
}

/// A temporal-chain relation between two episodic events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRelation {
    pub from_event: Uuid,
    pub to_event: Uuid,
    pub project_id: String,
    pub relation_type: EventRelationType,
    pub strength: f32,
}

/// A decaying suppression weight over a memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InhibitionRecord {
    pub id: Uuid,
    pub project_id: String,
    pub memory_id: Uuid,
    pub memory_layer: MemoryLayer,
    pub inhibition_strength: f32,
    pub inhibition_type: InhibitionType,
    pub reason: Option<String>,
    pub inhibited_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A span of attention directed at some target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionFocus {
    pub id: Uuid,
    pub project_id: String,
    pub focus_target: String,
    pub focus_type: FocusType,
    pub weight: f32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub transition_type: TransitionType,
    pub previous_focus_id: Option<Uuid>,
}

/// Derived saliency subfactors, all clamped to `[0,1]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SaliencyComponents {
    pub novelty: f32,
    pub surprise: f32,
    pub contradiction: f32,
    pub frequency: f32,
    pub recency: f32,
    pub relevance: f32,
}

/// A logged consolidation decision, used to (re)train the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRoute {
    pub id: Uuid,
    pub project_id: String,
    pub wm_id: Uuid,
    pub target_layer: MemoryLayer,
    pub confidence: f32,
    pub features: [f32; 11],
    pub was_correct: Option<bool>,
    pub routed_at: DateTime<Utc>,
}

/// A surprise boundary marked against an episodic event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurpriseBoundary {
    pub event_id: Uuid,
    pub surprise: f32,
}
