//! Central executive (C10): goal graph, attention focus, capacity enforcement.

pub mod attention;
pub mod capacity;
pub mod goals;

pub use attention::AttentionManager;
pub use capacity::{check_capacity, trigger_consolidation, CapacityStatus, CAPACITY_THRESHOLD};
pub use goals::GoalManager;
