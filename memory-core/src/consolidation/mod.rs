//! Consolidation router (C14): routes working-memory items to a
//! long-term layer and performs the atomic move.

pub mod features;
pub mod router;

pub use router::{
    heuristic_route, ConsolidationRouter, TabularClassifier, HEURISTIC_CONFIDENCE,
    MIN_TRAINING_EXAMPLES, RETRAIN_FEEDBACK_THRESHOLD,
};
