//! Spatial index (C4): a directory/file/symbol hierarchy used as the
//! coarse filter in two-stage retrieval (C16).

use crate::error::Result;
use crate::store::StoreKernel;
use crate::types::{NodeType, RelationType, SpatialNode, SpatialRelation};
use std::collections::{HashSet, VecDeque};

/// Builds and queries the spatial hierarchy on top of a [`StoreKernel`].
pub struct SpatialIndex<'a> {
    store: &'a dyn StoreKernel,
}

impl<'a> SpatialIndex<'a> {
    #[must_use]
    pub fn new(store: &'a dyn StoreKernel) -> Self {
        Self { store }
    }

    /// Register a path in the hierarchy, creating any missing ancestor
    /// directory nodes and a `Contains` edge (strength 1.0) from each
    /// parent to its child. Existing nodes are reused, so re-indexing the
    /// same path is a no-op past the first call.
    ///
    /// `symbol_kind` is attached only to the leaf node (e.g. `"function"`,
    /// `"class"`, `"method"`, `"struct"`, `"interface"` — the free-form
    /// vocabulary a host's own symbol extractor uses; this crate does not
    /// parse source, per spec.md's AST-extraction non-goal).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn index_path(
        &self,
        project_id: &str,
        path: &str,
        node_type: NodeType,
        symbol_kind: Option<String>,
    ) -> Result<()> {
        if self
            .store
            .find_spatial_node_by_path(project_id, path)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let components: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let mut parent_path: Option<String> = None;
        let mut accumulated = String::new();

        for (i, component) in components.iter().enumerate() {
            if !accumulated.is_empty() {
                accumulated.push('/');
            }
            accumulated.push_str(component);
            let is_last = i == components.len() - 1;
            let current_type = if is_last { node_type } else { NodeType::Directory };

            if self
                .store
                .find_spatial_node_by_path(project_id, &accumulated)
                .await?
                .is_none()
            {
                let node = SpatialNode {
                    project_id: project_id.to_string(),
                    name: (*component).to_string(),
                    full_path: accumulated.clone(),
                    depth: i as u32,
                    parent_path: parent_path.clone(),
                    node_type: current_type,
                    language: None,
                    symbol_kind: if is_last { symbol_kind.clone() } else { None },
                };
                self.store.upsert_spatial_node(&node).await?;
            }

            if let Some(parent) = &parent_path {
                self.store
                    .upsert_spatial_relation(&SpatialRelation {
                        from_path: parent.clone(),
                        to_path: accumulated.clone(),
                        project_id: project_id.to_string(),
                        relation_type: RelationType::Contains,
                        strength: 1.0,
                    })
                    .await?;
            }
            parent_path = Some(accumulated.clone());
        }

        Ok(())
    }

    /// Register a `Sibling` relation (strength 0.8, §4.4) between two nodes
    /// that share an immediate parent directory.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn relate_siblings(&self, project_id: &str, a: &str, b: &str) -> Result<()> {
        self.store
            .upsert_spatial_relation(&SpatialRelation {
                from_path: a.to_string(),
                to_path: b.to_string(),
                project_id: project_id.to_string(),
                relation_type: RelationType::Sibling,
                strength: 0.8,
            })
            .await
    }

    /// Index every `(path, node_type, symbol_kind)` triple co-occurring in
    /// one ingest (§4.2: relation extraction). Each path is indexed via
    /// [`Self::index_path`] (idempotent `contains` edges to its ancestors);
    /// leaf nodes that land under the same immediate parent directory are
    /// then additionally related as siblings (strength 0.8), deduplicated
    /// by natural key so re-ingesting the same batch adds nothing new.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn index_batch(
        &self,
        project_id: &str,
        entries: &[(String, NodeType, Option<String>)],
    ) -> Result<()> {
        for (path, node_type, symbol_kind) in entries {
            self.index_path(project_id, path, *node_type, symbol_kind.clone())
                .await?;
        }

        let mut by_parent: std::collections::HashMap<Option<String>, Vec<&str>> =
            std::collections::HashMap::new();
        for (path, _, _) in entries {
            let parent = path
                .trim_start_matches('/')
                .rsplit_once('/')
                .map(|(parent, _)| parent.to_string());
            by_parent.entry(parent).or_default().push(path.as_str());
        }

        for siblings in by_parent.values() {
            for i in 0..siblings.len() {
                for j in (i + 1)..siblings.len() {
                    self.relate_siblings(project_id, siblings[i], siblings[j])
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// Breadth-first traversal of nodes within `max_depth` edges of `root`,
    /// used as the coarse filter stage of retrieval (§4.16). The root is
    /// included at depth 0.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn neighborhood(
        &self,
        project_id: &str,
        root: &str,
        max_depth: usize,
    ) -> Result<Vec<String>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(root.to_string());
        queue.push_back((root.to_string(), 0usize));
        let mut out = vec![root.to_string()];

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for relation in self.store.get_spatial_relations(project_id, &node).await? {
                let neighbor = if relation.from_path == node {
                    relation.to_path
                } else {
                    relation.from_path
                };
                if visited.insert(neighbor.clone()) {
                    out.push(neighbor.clone());
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        Ok(out)
    }

    /// Graph distance (in edges) between two nodes, capped at `max_depth`.
    /// Returns `None` if the nodes are farther apart than `max_depth` or
    /// unconnected — callers use this as a fallback score when no relation
    /// path exists (§4.16).
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    pub async fn distance(
        &self,
        project_id: &str,
        a: &str,
        b: &str,
        max_depth: usize,
    ) -> Result<Option<usize>> {
        if a == b {
            return Ok(Some(0));
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(a.to_string());
        queue.push_back((a.to_string(), 0usize));

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for relation in self.store.get_spatial_relations(project_id, &node).await? {
                let neighbor = if relation.from_path == node {
                    relation.to_path
                } else {
                    relation.from_path
                };
                if neighbor == b {
                    return Ok(Some(depth + 1));
                }
                if visited.insert(neighbor.clone()) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
        Ok(None)
    }
}

/// `(depth1 − common) + (depth2 − common)`, where `common` is the length
/// of the longest shared path-component prefix (§4.2). Used by the
/// retrieval engine when [`SpatialIndex::distance`] finds no indexed
/// relation path between the two nodes.
#[must_use]
pub fn path_distance(p1: &str, p2: &str) -> usize {
    let c1: Vec<&str> = p1.trim_start_matches('/').split('/').collect();
    let c2: Vec<&str> = p2.trim_start_matches('/').split('/').collect();
    let common = c1.iter().zip(c2.iter()).take_while(|(a, b)| a == b).count();
    (c1.len() - common) + (c2.len() - common)
}

#[cfg(test)]
mod path_distance_tests {
    use super::path_distance;

    #[test]
    fn siblings_are_two_apart() {
        assert_eq!(path_distance("/proj/src/auth/a.py", "/proj/src/auth/b.py"), 2);
    }

    #[test]
    fn distant_paths_are_farther() {
        assert_eq!(path_distance("/proj/src/auth/a.py", "/proj/src/db/c.py"), 4);
    }

    #[test]
    fn identical_paths_are_zero() {
        assert_eq!(path_distance("/proj/src/a.py", "/proj/src/a.py"), 0);
    }
}
