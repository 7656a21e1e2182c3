//! # memory-storage-redb
//!
//! An embedded, single-file [`redb`] implementation of
//! [`memory_core::store::StoreKernel`] (C3) — the primary/default
//! storage backend for the cognitive memory substrate.
//!
//! Every entity is stored postcard-encoded under a flat key/value table;
//! secondary lookups (by project, by date range, by working-memory
//! component, ...) scan the relevant table and filter in memory. This
//! mirrors the allowance §4.4 gives the semantic store's nearest-neighbor
//! search ("naive linear scan for ≤10⁴ records per project") and applies
//! it uniformly — appropriate for a local, single-writer embedded store,
//! not for the out-of-scope clustering deployments §1 excludes.
//!
//! redb transactions are synchronous; every [`StoreKernel`] method here
//! runs its redb work inside [`tokio::task::spawn_blocking`], so no
//! suspension point ever occurs while a redb transaction is open
//! (§5: "No suspension occurs inside a transaction").
//!
//! ## Example
//!
//! ```no_run
//! use memory_storage_redb::RedbStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = RedbStore::open("./memory.redb", 384, 1800).await?;
//! # Ok(())
//! # }
//! ```

mod codec;
mod tables;
mod transaction;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use memory_core::error::{Error, Result};
use memory_core::store::{StoreKernel, Transaction};
use memory_core::types::{
    AttentionFocus, Component, ConsolidationRoute, Event, EventRelation, Goal, GoalStatus,
    InhibitionRecord, ProceduralTemplate, ProspectiveTask, SemanticRecord, SpatialNode,
    SpatialRelation, TaskStatus, WorkingMemoryItem,
};
use parking_lot::Mutex as SyncMutex;
use redb::{Database, ReadableTable};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use codec::{decode, encode};
use tables::{
    ALL_TABLES, ATTENTION_FOCUS, CONSOLIDATION_ROUTES, EVENTS, EVENT_RELATIONS,
    INHIBITION_RECORDS, GOALS, PROCEDURAL_TEMPLATES, PROSPECTIVE_TASKS, SEMANTIC_RECORDS,
    SPATIAL_NODES, SPATIAL_RELATIONS, WM_ITEMS,
};
use transaction::RedbTransaction;

fn store_err(e: impl std::fmt::Display) -> Error {
    Error::StoreError(e.to_string())
}

/// Decayed contribution of one inhibition record at `now`, per §4.10:
/// `base · 2^(−Δt/H)`, zero once `expires_at` has passed.
fn inhibition_contribution(record: &InhibitionRecord, now: DateTime<Utc>, half_life_s: i64) -> f32 {
    if let Some(expires_at) = record.expires_at {
        if now >= expires_at {
            return 0.0;
        }
    }
    let delta_t = (now - record.inhibited_at).num_seconds().max(0) as f32;
    let half_life = half_life_s.max(1) as f32;
    record.inhibition_strength * 2f32.powf(-delta_t / half_life)
}

/// redb-backed [`StoreKernel`].
pub struct RedbStore {
    db: Arc<Database>,
    embedding_dim: usize,
    inhibition_half_life_s: i64,
    project_locks: SyncMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RedbStore {
    /// Open (creating if absent) a redb file at `path`. `embedding_dim`
    /// is enforced on every embedding written through this store
    /// (§4.1); `inhibition_half_life_s` is the default used by
    /// [`StoreKernel::gc_inhibition_records`], which doesn't carry a
    /// per-call half-life.
    ///
    /// # Errors
    /// Returns an error if the file can't be created/opened or schema
    /// initialization fails.
    pub async fn open(
        path: impl AsRef<Path>,
        embedding_dim: usize,
        inhibition_half_life_s: i64,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = tokio::task::spawn_blocking(move || -> Result<Database> {
            let db = Database::create(&path).map_err(store_err)?;
            let write_txn = db.begin_write().map_err(store_err)?;
            for table in ALL_TABLES {
                write_txn.open_table(*table).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(db)
        })
        .await
        .map_err(store_err)??;

        Ok(Self {
            db: Arc::new(db),
            embedding_dim,
            inhibition_half_life_s,
            project_locks: SyncMutex::new(HashMap::new()),
        })
    }

    /// An in-memory redb database, for tests.
    ///
    /// # Errors
    /// Returns an error if schema initialization fails.
    pub async fn in_memory(embedding_dim: usize, inhibition_half_life_s: i64) -> Result<Self> {
        let db = tokio::task::spawn_blocking(move || -> Result<Database> {
            let db = Database::builder()
                .create_with_backend(redb::backends::InMemoryBackend::new())
                .map_err(store_err)?;
            let write_txn = db.begin_write().map_err(store_err)?;
            for table in ALL_TABLES {
                write_txn.open_table(*table).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(db)
        })
        .await
        .map_err(store_err)??;

        Ok(Self {
            db: Arc::new(db),
            embedding_dim,
            inhibition_half_life_s,
            project_locks: SyncMutex::new(HashMap::new()),
        })
    }

    fn check_dim(&self, embedding: Option<&[f32]>) -> Result<()> {
        if let Some(e) = embedding {
            if e.len() != self.embedding_dim {
                return Err(Error::SchemaMismatch(format!(
                    "embedding has {} dims, project is configured for {}",
                    e.len(),
                    self.embedding_dim
                )));
            }
        }
        Ok(())
    }

    /// Per-project write serialization (§5: "one writer per project at a
    /// time"). Readers never wait on this lock.
    fn project_lock(&self, project_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.project_locks.lock();
        locks
            .entry(project_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

#[async_trait]
impl StoreKernel for RedbStore {
    // ---- episodic (C5) ----

    async fn record_event(&self, event: &Event) -> Result<()> {
        self.check_dim(event.embedding.as_deref())?;
        let lock = self.project_lock(&event.project_id);
        let _guard = lock.lock().await;

        let db = Arc::clone(&self.db);
        let bytes = encode(event)?;
        let key = event.id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(EVENTS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Event>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(EVENTS).map_err(store_err)?;
            match table.get(key.as_str()).map_err(store_err)? {
                Some(v) => Ok(Some(decode(v.value())?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(store_err)?
    }

    async fn get_recent_events(&self, project_id: &str, limit: usize) -> Result<Vec<Event>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Event>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(EVENTS).map_err(store_err)?;
            let mut events: Vec<Event> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<Event>(v.value()).ok())
                .filter(|e| e.project_id == project_id)
                .collect();
            events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            events.truncate(limit);
            Ok(events)
        })
        .await
        .map_err(store_err)?
    }

    async fn get_events_by_date(
        &self,
        project_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Event>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(EVENTS).map_err(store_err)?;
            let mut events: Vec<Event> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<Event>(v.value()).ok())
                .filter(|e| e.project_id == project_id && e.timestamp >= start && e.timestamp <= end)
                .collect();
            events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(events)
        })
        .await
        .map_err(store_err)?
    }

    async fn count_unprocessed_events(&self, project_id: &str) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<usize> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(EVENTS).map_err(store_err)?;
            let count = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<Event>(v.value()).ok())
                .filter(|e| e.project_id == project_id && !e.consolidated)
                .count();
            Ok(count)
        })
        .await
        .map_err(store_err)?
    }

    async fn mark_event_consolidated(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(EVENTS).map_err(store_err)?;
                let Some(existing) = table.get(key.as_str()).map_err(store_err)? else {
                    return Err(Error::NotFound(id));
                };
                let mut event: Event = decode(existing.value())?;
                drop(existing);
                event.consolidated = true;
                let bytes = encode(&event)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn create_event_relation(&self, relation: &EventRelation) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = format!(
            "{}|{}|{:?}",
            relation.from_event, relation.to_event, relation.relation_type
        );
        let bytes = encode(relation)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(EVENT_RELATIONS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    // ---- semantic (C6) ----

    async fn upsert_semantic_record(&self, record: &SemanticRecord) -> Result<Uuid> {
        self.check_dim(Some(&record.embedding))?;
        let db = Arc::clone(&self.db);
        let key = record.id.to_string();
        let bytes = encode(record)?;
        let id = record.id;
        tokio::task::spawn_blocking(move || -> Result<Uuid> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(SEMANTIC_RECORDS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(id)
        })
        .await
        .map_err(store_err)?
    }

    async fn get_semantic_record(&self, id: Uuid) -> Result<Option<SemanticRecord>> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<SemanticRecord>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(SEMANTIC_RECORDS).map_err(store_err)?;
            match table.get(key.as_str()).map_err(store_err)? {
                Some(v) => Ok(Some(decode(v.value())?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(store_err)?
    }

    async fn get_active_semantic_records(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<SemanticRecord>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<SemanticRecord>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(SEMANTIC_RECORDS).map_err(store_err)?;
            let mut records: Vec<SemanticRecord> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<SemanticRecord>(v.value()).ok())
                .filter(|r| r.project_id == project_id && r.active)
                .collect();
            records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            records.truncate(limit);
            Ok(records)
        })
        .await
        .map_err(store_err)?
    }

    async fn set_semantic_active(&self, id: Uuid, active: bool) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(SEMANTIC_RECORDS).map_err(store_err)?;
                let Some(existing) = table.get(key.as_str()).map_err(store_err)? else {
                    return Err(Error::NotFound(id));
                };
                let mut record: SemanticRecord = decode(existing.value())?;
                drop(existing);
                record.active = active;
                let bytes = encode(&record)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    // ---- procedural (C7) ----

    async fn insert_procedural_template(&self, template: &ProceduralTemplate) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = template.id.to_string();
        let bytes = encode(template)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(PROCEDURAL_TEMPLATES).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_procedural_templates(&self, project_id: &str) -> Result<Vec<ProceduralTemplate>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<ProceduralTemplate>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(PROCEDURAL_TEMPLATES).map_err(store_err)?;
            let mut templates: Vec<ProceduralTemplate> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<ProceduralTemplate>(v.value()).ok())
                .filter(|t| t.project_id == project_id)
                .collect();
            templates.sort_by(|a, b| b.frequency.cmp(&a.frequency));
            Ok(templates)
        })
        .await
        .map_err(store_err)?
    }

    async fn record_procedural_usage(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(PROCEDURAL_TEMPLATES).map_err(store_err)?;
                let Some(existing) = table.get(key.as_str()).map_err(store_err)? else {
                    return Err(Error::NotFound(id));
                };
                let mut template: ProceduralTemplate = decode(existing.value())?;
                drop(existing);
                template.frequency += 1;
                let bytes = encode(&template)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    // ---- prospective (C8) ----

    async fn insert_prospective_task(&self, task: &ProspectiveTask) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = task.id.to_string();
        let bytes = encode(task)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(PROSPECTIVE_TASKS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_pending_prospective_tasks(&self, project_id: &str) -> Result<Vec<ProspectiveTask>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<ProspectiveTask>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(PROSPECTIVE_TASKS).map_err(store_err)?;
            let tasks: Vec<ProspectiveTask> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<ProspectiveTask>(v.value()).ok())
                .filter(|t| {
                    t.project_id == project_id
                        && !matches!(t.status, TaskStatus::Done | TaskStatus::Cancelled)
                })
                .collect();
            Ok(tasks)
        })
        .await
        .map_err(store_err)?
    }

    async fn complete_prospective_task(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(PROSPECTIVE_TASKS).map_err(store_err)?;
                let Some(existing) = table.get(key.as_str()).map_err(store_err)? else {
                    return Err(Error::NotFound(id));
                };
                let mut task: ProspectiveTask = decode(existing.value())?;
                drop(existing);
                task.status = TaskStatus::Done;
                let bytes = encode(&task)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    // ---- working memory (C9) ----

    async fn upsert_wm_item(&self, item: &WorkingMemoryItem) -> Result<()> {
        self.check_dim(item.embedding.as_deref())?;
        let db = Arc::clone(&self.db);
        let key = item.id.to_string();
        let bytes = encode(item)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(WM_ITEMS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_wm_items(&self, project_id: &str, component: Component) -> Result<Vec<WorkingMemoryItem>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<WorkingMemoryItem>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(WM_ITEMS).map_err(store_err)?;
            let items: Vec<WorkingMemoryItem> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<WorkingMemoryItem>(v.value()).ok())
                .filter(|i| i.project_id == project_id && i.component == component)
                .collect();
            Ok(items)
        })
        .await
        .map_err(store_err)?
    }

    async fn remove_wm_item(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(WM_ITEMS).map_err(store_err)?;
                table.remove(key.as_str()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    // ---- central executive (C10) ----

    async fn upsert_goal(&self, goal: &Goal) -> Result<()> {
        self.check_dim(goal.embedding.as_deref())?;
        let db = Arc::clone(&self.db);
        let key = goal.id.to_string();
        let bytes = encode(goal)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(GOALS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_goal(&self, id: Uuid) -> Result<Option<Goal>> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Goal>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(GOALS).map_err(store_err)?;
            match table.get(key.as_str()).map_err(store_err)? {
                Some(v) => Ok(Some(decode(v.value())?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(store_err)?
    }

    async fn get_active_goals(&self, project_id: &str) -> Result<Vec<Goal>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Goal>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(GOALS).map_err(store_err)?;
            let goals: Vec<Goal> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<Goal>(v.value()).ok())
                .filter(|g| g.project_id == project_id && g.status == GoalStatus::Active)
                .collect();
            Ok(goals)
        })
        .await
        .map_err(store_err)?
    }

    async fn get_child_goals(&self, project_id: &str, parent_id: Option<Uuid>) -> Result<Vec<Goal>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<Goal>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(GOALS).map_err(store_err)?;
            let goals: Vec<Goal> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<Goal>(v.value()).ok())
                .filter(|g| g.project_id == project_id && g.parent_goal_id == parent_id)
                .collect();
            Ok(goals)
        })
        .await
        .map_err(store_err)?
    }

    async fn upsert_attention_focus(&self, focus: &AttentionFocus) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = focus.id.to_string();
        let bytes = encode(focus)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(ATTENTION_FOCUS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_active_focuses(&self, project_id: &str) -> Result<Vec<AttentionFocus>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<AttentionFocus>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(ATTENTION_FOCUS).map_err(store_err)?;
            let focuses: Vec<AttentionFocus> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<AttentionFocus>(v.value()).ok())
                .filter(|f| f.project_id == project_id && f.ended_at.is_none())
                .collect();
            Ok(focuses)
        })
        .await
        .map_err(store_err)?
    }

    async fn end_primary_focus(&self, project_id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(ATTENTION_FOCUS).map_err(store_err)?;
                let to_end: Vec<(String, AttentionFocus)> = table
                    .iter()
                    .map_err(store_err)?
                    .filter_map(|r| r.ok())
                    .filter_map(|(k, v)| {
                        let focus: AttentionFocus = decode(v.value()).ok()?;
                        Some((k.value().to_string(), focus))
                    })
                    .filter(|(_, f)| {
                        f.project_id == project_id
                            && f.ended_at.is_none()
                            && f.focus_type == memory_core::types::FocusType::Primary
                    })
                    .collect();
                for (key, mut focus) in to_end {
                    focus.ended_at = Some(Utc::now());
                    let bytes = encode(&focus)?;
                    table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
                }
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    // ---- spatial (C4) ----

    async fn upsert_spatial_node(&self, node: &SpatialNode) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = format!("{}|{}", node.project_id, node.full_path);
        let bytes = encode(node)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(SPATIAL_NODES).map_err(store_err)?;
                if table.get(key.as_str()).map_err(store_err)?.is_none() {
                    table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
                }
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn find_spatial_node_by_path(
        &self,
        project_id: &str,
        full_path: &str,
    ) -> Result<Option<SpatialNode>> {
        let db = Arc::clone(&self.db);
        let key = format!("{project_id}|{full_path}");
        tokio::task::spawn_blocking(move || -> Result<Option<SpatialNode>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(SPATIAL_NODES).map_err(store_err)?;
            match table.get(key.as_str()).map_err(store_err)? {
                Some(v) => Ok(Some(decode(v.value())?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(store_err)?
    }

    async fn upsert_spatial_relation(&self, relation: &SpatialRelation) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = format!(
            "{}|{}|{}|{:?}",
            relation.project_id, relation.from_path, relation.to_path, relation.relation_type
        );
        let bytes = encode(relation)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(SPATIAL_RELATIONS).map_err(store_err)?;
                if table.get(key.as_str()).map_err(store_err)?.is_none() {
                    table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
                }
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_spatial_relations(
        &self,
        project_id: &str,
        full_path: &str,
    ) -> Result<Vec<SpatialRelation>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        let full_path = full_path.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<SpatialRelation>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(SPATIAL_RELATIONS).map_err(store_err)?;
            let relations: Vec<SpatialRelation> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<SpatialRelation>(v.value()).ok())
                .filter(|r| {
                    r.project_id == project_id
                        && (r.from_path == full_path || r.to_path == full_path)
                })
                .collect();
            Ok(relations)
        })
        .await
        .map_err(store_err)?
    }

    // ---- inhibition (C13) ----

    async fn insert_inhibition_record(&self, record: &InhibitionRecord) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = record.id.to_string();
        let bytes = encode(record)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(INHIBITION_RECORDS).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_inhibition_records(&self, target_id: Uuid) -> Result<Vec<InhibitionRecord>> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || -> Result<Vec<InhibitionRecord>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(INHIBITION_RECORDS).map_err(store_err)?;
            let records: Vec<InhibitionRecord> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<InhibitionRecord>(v.value()).ok())
                .filter(|r| r.memory_id == target_id)
                .collect();
            Ok(records)
        })
        .await
        .map_err(store_err)?
    }

    async fn gc_inhibition_records(&self, min_strength: f32) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let half_life_s = self.inhibition_half_life_s;
        tokio::task::spawn_blocking(move || -> Result<usize> {
            let now = Utc::now();
            let write_txn = db.begin_write().map_err(store_err)?;
            let mut removed = 0usize;
            {
                let mut table = write_txn.open_table(INHIBITION_RECORDS).map_err(store_err)?;
                let stale: Vec<String> = table
                    .iter()
                    .map_err(store_err)?
                    .filter_map(|r| r.ok())
                    .filter_map(|(k, v)| {
                        let record: InhibitionRecord = decode(v.value()).ok()?;
                        Some((k.value().to_string(), record))
                    })
                    .filter(|(_, r)| inhibition_contribution(r, now, half_life_s) < min_strength)
                    .map(|(k, _)| k)
                    .collect();
                for key in stale {
                    table.remove(key.as_str()).map_err(store_err)?;
                    removed += 1;
                }
            }
            write_txn.commit().map_err(store_err)?;
            Ok(removed)
        })
        .await
        .map_err(store_err)?
    }

    // ---- consolidation (C14) ----

    async fn insert_consolidation_route(&self, route: &ConsolidationRoute) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = route.id.to_string();
        let bytes = encode(route)?;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let mut table = write_txn.open_table(CONSOLIDATION_ROUTES).map_err(store_err)?;
                table.insert(key.as_str(), bytes.as_slice()).map_err(store_err)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }

    async fn get_recent_consolidation_routes(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<ConsolidationRoute>> {
        let db = Arc::clone(&self.db);
        let project_id = project_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<ConsolidationRoute>> {
            let read_txn = db.begin_read().map_err(store_err)?;
            let table = read_txn.open_table(CONSOLIDATION_ROUTES).map_err(store_err)?;
            let mut routes: Vec<ConsolidationRoute> = table
                .iter()
                .map_err(store_err)?
                .filter_map(|r| r.ok())
                .filter_map(|(_, v)| decode::<ConsolidationRoute>(v.value()).ok())
                .filter(|r| r.project_id == project_id)
                .collect();
            routes.sort_by(|a, b| b.routed_at.cmp(&a.routed_at));
            routes.truncate(limit);
            Ok(routes)
        })
        .await
        .map_err(store_err)?
    }

    async fn transaction(
        &self,
        body: Box<dyn FnOnce(&dyn Transaction) -> Result<()> + Send>,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || -> Result<()> {
            let write_txn = db.begin_write().map_err(store_err)?;
            {
                let txn_impl = RedbTransaction { txn: &write_txn };
                body(&txn_impl)?;
            }
            write_txn.commit().map_err(store_err)?;
            Ok(())
        })
        .await
        .map_err(store_err)?
    }
}
