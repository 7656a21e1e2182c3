//! Table definitions for the redb store kernel backend.
//!
//! Every table is a flat `&str -> &[u8]` map; the key encodes whatever
//! natural key the entity needs (a UUID for id-addressed entities, a
//! `project_id|...` composite for append-only/idempotent ones) and the
//! value is the entity's [`crate::codec::encode`]d bytes. Secondary
//! lookups (by project, by date range, by component) are done by
//! scanning a table and filtering in memory — acceptable at the scale
//! this embedded single-file backend targets (§4.4 explicitly allows a
//! naive linear scan for the semantic store below 10^4 records per
//! project; this backend applies the same allowance uniformly).

use redb::TableDefinition;

pub(crate) const EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("events");
pub(crate) const EVENT_RELATIONS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("event_relations");
pub(crate) const SEMANTIC_RECORDS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("semantic_records");
pub(crate) const PROCEDURAL_TEMPLATES: TableDefinition<&str, &[u8]> =
    TableDefinition::new("procedural_templates");
pub(crate) const PROSPECTIVE_TASKS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("prospective_tasks");
pub(crate) const WM_ITEMS: TableDefinition<&str, &[u8]> = TableDefinition::new("wm_items");
pub(crate) const GOALS: TableDefinition<&str, &[u8]> = TableDefinition::new("goals");
pub(crate) const ATTENTION_FOCUS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("attention_focus");
pub(crate) const SPATIAL_NODES: TableDefinition<&str, &[u8]> =
    TableDefinition::new("spatial_nodes");
pub(crate) const SPATIAL_RELATIONS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("spatial_relations");
pub(crate) const INHIBITION_RECORDS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("inhibition_records");
pub(crate) const CONSOLIDATION_ROUTES: TableDefinition<&str, &[u8]> =
    TableDefinition::new("consolidation_routes");

/// Every table, opened once at store creation so a fresh `.redb` file
/// has a stable schema from the first write (redb requires a table to
/// have been opened inside at least one write transaction before reads
/// against it succeed).
pub(crate) const ALL_TABLES: &[TableDefinition<'static, &str, &[u8]>] = &[
    EVENTS,
    EVENT_RELATIONS,
    SEMANTIC_RECORDS,
    PROCEDURAL_TEMPLATES,
    PROSPECTIVE_TASKS,
    WM_ITEMS,
    GOALS,
    ATTENTION_FOCUS,
    SPATIAL_NODES,
    SPATIAL_RELATIONS,
    INHIBITION_RECORDS,
    CONSOLIDATION_ROUTES,
];
