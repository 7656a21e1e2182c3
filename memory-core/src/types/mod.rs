//! Entity definitions, enums, configuration, and fixed keyword vocabularies
//! shared across every module in the crate.

pub mod config;
pub mod constants;
pub mod enums;
pub mod structs;

pub use config::{Config, SaliencyWeights};
pub use enums::{
    Component, ContentType, EventRelationType, EventType, FocusType, GoalStatus, GoalType,
    InhibitionType, MemoryLayer, NodeType, Priority, RelationType, TaskStatus, TransitionType,
};
pub use structs::{
    AttentionFocus, ConsolidationRoute, Embedding, Event, EventContext, EventRelation, Goal,
    InhibitionRecord, ProceduralTemplate, ProspectiveTask, SaliencyComponents, SemanticRecord,
    SpatialNode, SpatialRelation, SurpriseBoundary, WorkingMemoryItem,
};
