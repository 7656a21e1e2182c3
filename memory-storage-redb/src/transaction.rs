//! [`memory_core::store::Transaction`] implementation over a single
//! in-flight redb write transaction.

use crate::codec::encode;
use crate::tables::{EVENTS, PROCEDURAL_TEMPLATES, PROSPECTIVE_TASKS, SEMANTIC_RECORDS, WM_ITEMS};
use memory_core::error::{Error, Result};
use memory_core::store::Transaction;
use memory_core::types::{Event, ProceduralTemplate, ProspectiveTask, SemanticRecord, WorkingMemoryItem};
use redb::{ReadableTable, WriteTransaction};
use uuid::Uuid;

/// Scopes every [`Transaction`] method to one open `redb::WriteTransaction`.
/// Built fresh inside the `spawn_blocking` closure that
/// [`crate::RedbStore::transaction`] runs, and dropped before the caller
/// commits — consolidation's "insert into target layer, delete WM row"
/// move (§4.11) is therefore atomic: both writes land in the same redb
/// commit, or neither does.
pub(crate) struct RedbTransaction<'t> {
    pub(crate) txn: &'t WriteTransaction,
}

fn store_err(e: impl std::fmt::Display) -> Error {
    Error::StoreError(e.to_string())
}

impl Transaction for RedbTransaction<'_> {
    fn put_semantic_record(&self, record: &SemanticRecord) -> Result<Uuid> {
        let bytes = encode(record)?;
        let key = record.id.to_string();
        let mut table = self.txn.open_table(SEMANTIC_RECORDS).map_err(store_err)?;
        table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
        Ok(record.id)
    }

    fn put_event(&self, event: &Event) -> Result<()> {
        let bytes = encode(event)?;
        let key = event.id.to_string();
        let mut table = self.txn.open_table(EVENTS).map_err(store_err)?;
        table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
        Ok(())
    }

    fn put_procedural_template(&self, template: &ProceduralTemplate) -> Result<()> {
        let bytes = encode(template)?;
        let key = template.id.to_string();
        let mut table = self.txn.open_table(PROCEDURAL_TEMPLATES).map_err(store_err)?;
        table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
        Ok(())
    }

    fn put_prospective_task(&self, task: &ProspectiveTask) -> Result<()> {
        let bytes = encode(task)?;
        let key = task.id.to_string();
        let mut table = self.txn.open_table(PROSPECTIVE_TASKS).map_err(store_err)?;
        table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
        Ok(())
    }

    fn remove_wm_item(&self, id: Uuid) -> Result<()> {
        let key = id.to_string();
        let mut table = self.txn.open_table(WM_ITEMS).map_err(store_err)?;
        table.remove(key.as_str()).map_err(store_err)?;
        Ok(())
    }

    fn mark_event_consolidated(&self, id: Uuid) -> Result<()> {
        let key = id.to_string();
        let mut table = self.txn.open_table(EVENTS).map_err(store_err)?;
        let Some(existing) = table.get(key.as_str()).map_err(store_err)? else {
            return Err(Error::NotFound(id));
        };
        let mut event: Event = crate::codec::decode(existing.value())?;
        drop(existing);
        event.consolidated = true;
        let bytes = encode(&event)?;
        table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
        Ok(())
    }
}
