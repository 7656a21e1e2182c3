//! Cross-entity atomic writes.
//!
//! `Transaction` is deliberately sync: backends that are natively sync
//! (redb) run the whole transaction body inside one `spawn_blocking`;
//! backends that are natively async (libsql) buffer the writes and flush
//! them in one round trip on commit.

use crate::error::Result;
use crate::types::{Event, ProceduralTemplate, ProspectiveTask, SemanticRecord, WorkingMemoryItem};
use uuid::Uuid;

/// Operations available inside a [`super::StoreKernel::transaction`] body.
///
/// Scoped to what the pipeline actually needs atomically: moving an item
/// out of working memory into exactly one long-term layer (§4.11
/// `consolidate_item`), whichever of semantic/episodic/procedural/
/// prospective the router chose. General multi-entity queries still go
/// through [`super::StoreKernel`] outside the transaction.
pub trait Transaction {
    /// Write a semantic record as part of this transaction.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn put_semantic_record(&self, record: &SemanticRecord) -> Result<Uuid>;

    /// Write an episodic event (with `wm_id` lineage) as part of this
    /// transaction.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn put_event(&self, event: &Event) -> Result<()>;

    /// Write a procedural template as part of this transaction.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn put_procedural_template(&self, template: &ProceduralTemplate) -> Result<()>;

    /// Write a prospective task as part of this transaction.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn put_prospective_task(&self, task: &ProspectiveTask) -> Result<()>;

    /// Remove a working-memory item as part of this transaction.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn remove_wm_item(&self, id: Uuid) -> Result<()>;

    /// Mark an event consolidated as part of this transaction.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    fn mark_event_consolidated(&self, id: Uuid) -> Result<()>;
}
