use serde::{Deserialize, Serialize};

/// The long-term memory layer a working-memory item can be routed to.
///
/// Represented as a sealed enum (rather than the donor system's duck-typed
/// `"semantic" | "episodic" | ...` strings) so an unknown layer is a compile
/// error, not a silent 0.5 fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryLayer {
    Semantic,
    Episodic,
    Procedural,
    Prospective,
}

impl MemoryLayer {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryLayer::Semantic => "semantic",
            MemoryLayer::Episodic => "episodic",
            MemoryLayer::Procedural => "procedural",
            MemoryLayer::Prospective => "prospective",
        }
    }
}

/// Working-memory item content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Verbal,
    Spatial,
    Episodic,
    Goal,
}

/// Which working-memory buffer owns an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Phonological,
    Visuospatial,
    EpisodicBuffer,
    CentralExecutive,
}

impl Component {
    /// Capacity of this component's buffer, per Miller (1956) / Baddeley (2000).
    #[must_use]
    pub fn default_capacity(self) -> usize {
        match self {
            Component::Phonological | Component::Visuospatial => 7,
            Component::EpisodicBuffer => 4,
            Component::CentralExecutive => usize::MAX,
        }
    }
}

/// Goal kind in the central executive's goal hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Primary,
    Subgoal,
    Maintenance,
}

/// Goal lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Suspended,
    Completed,
    Blocked,
    Failed,
}

/// Prospective task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Med,
    High,
}

/// Prospective task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Active,
    Done,
    Cancelled,
}

/// Spatial node kind in the hierarchy/symbol graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Directory,
    File,
    Module,
    Class,
    Function,
    Method,
    Interface,
    Type,
}

impl NodeType {
    /// Whether this node type is a code symbol (requires `language`).
    #[must_use]
    pub fn is_symbol(self) -> bool {
        matches!(
            self,
            NodeType::Function | NodeType::Class | NodeType::Method
        )
    }
}

/// Relation kind between two spatial nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Contains,
    Sibling,
    AncestorOf,
}

/// Inhibition record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InhibitionType {
    Proactive,
    Retroactive,
    Selective,
}

/// Attention focus kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusType {
    Primary,
    Secondary,
    Background,
    Memory,
    File,
    Concept,
    Task,
    Problem,
}

/// How an attention focus transitioned in from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    /// No previous focus to transition from.
    Initial,
    /// Explicit `set_attention_focus` call.
    Manual,
    /// `auto_focus_top_memories` set this focus.
    AutoFocus,
}

/// Episodic event kind, free-form but commonly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AgentAction,
    Observation,
    ConversationTurn,
    CodeAnalysis,
    Other(String),
}

/// Temporal-chain relation between two episodic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventRelationType {
    Precedes,
    Causes,
    SameSession,
}
