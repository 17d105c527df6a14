//! Sharded in-memory graph storage
//!
//! Nodes and edges live in DashMaps keyed by record id, with two secondary
//! indices: label → node ids and node id → incident edge ids.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, lock-free reads
//! - FxHashSet: O(1) index membership, fast non-crypto hash
//! - Records are never physically removed; soft-deletion is a property write
//!
//! # Thread Safety
//!
//! Individual reads and writes are thread-safe. Atomic visibility of a whole
//! transaction is provided one level up: the transaction manager holds the
//! commit gate exclusively while calling [`ShardedStore::apply_batch`].

use dashmap::DashMap;
use larder_core::record::{EdgeRecord, NodeRecord, Versioned};
use larder_core::traits::GraphStorage;
use larder_core::LarderResult;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sharded graph store
///
/// # Example
///
/// ```ignore
/// use larder_storage::ShardedStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(ShardedStore::new());
/// let version = store.next_version();
/// store.put_node(node, version);
/// ```
pub struct ShardedStore {
    nodes: DashMap<String, Versioned<NodeRecord>>,
    edges: DashMap<String, Versioned<EdgeRecord>>,
    /// label → ids of nodes carrying it
    labels: DashMap<String, FxHashSet<String>>,
    /// node id → ids of edges incident to it
    adjacency: DashMap<String, FxHashSet<String>>,
    /// node id → version of the last write that linked a new edge to it
    adjacency_versions: DashMap<String, u64>,
    /// Global commit version
    version: AtomicU64,
}

impl ShardedStore {
    /// Create new sharded store
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create with expected number of records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: DashMap::with_capacity(capacity),
            edges: DashMap::with_capacity(capacity),
            labels: DashMap::new(),
            adjacency: DashMap::with_capacity(capacity),
            adjacency_versions: DashMap::with_capacity(capacity),
            version: AtomicU64::new(0),
        }
    }

    /// Get current version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Increment version and return new value
    #[inline]
    pub fn allocate_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of stored nodes (including soft-deleted ones)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges (including soft-deleted ones)
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ========================================================================
    // Record access
    // ========================================================================

    /// Get a node by id
    #[inline]
    pub fn node(&self, id: &str) -> Option<Versioned<NodeRecord>> {
        self.nodes.get(id).map(|entry| entry.value().clone())
    }

    /// Get an edge by id
    #[inline]
    pub fn edge(&self, id: &str) -> Option<Versioned<EdgeRecord>> {
        self.edges.get(id).map(|entry| entry.value().clone())
    }

    /// Insert or replace a node, keeping the label index current
    pub fn put_node(&self, node: NodeRecord, version: u64) {
        let id = node.id.clone();
        let new_labels = node.labels.clone();
        let previous = self.nodes.insert(id.clone(), Versioned::new(node, version));

        if let Some(old) = previous {
            for label in old.value.labels.difference(&new_labels) {
                if let Some(mut ids) = self.labels.get_mut(label) {
                    ids.remove(&id);
                }
            }
        }
        for label in new_labels {
            self.labels.entry(label).or_default().insert(id.clone());
        }
    }

    /// Insert or replace an edge, keeping the adjacency index current
    ///
    /// Every endpoint whose incident edge set changes gets its adjacency
    /// version bumped to `version`. Rewriting an edge in place does not.
    pub fn put_edge(&self, edge: EdgeRecord, version: u64) {
        let id = edge.id.clone();
        let (src, dst) = (edge.src.clone(), edge.dst.clone());
        let previous = self.edges.insert(id.clone(), Versioned::new(edge, version));

        let mut changed: Vec<String> = Vec::new();
        if let Some(old) = previous {
            for endpoint in [old.value.src, old.value.dst] {
                if endpoint != src && endpoint != dst {
                    if let Some(mut ids) = self.adjacency.get_mut(endpoint.as_str()) {
                        ids.remove(&id);
                    }
                    changed.push(endpoint);
                }
            }
        }
        for endpoint in [src, dst] {
            if self.adjacency.entry(endpoint.clone()).or_default().insert(id.clone()) {
                changed.push(endpoint);
            }
        }
        for endpoint in changed {
            self.adjacency_versions.insert(endpoint, version);
        }
    }

    /// Adjacency version of `node_id`; 0 if no edge was ever linked to it
    pub fn adjacency_version(&self, node_id: &str) -> u64 {
        self.adjacency_versions
            .get(node_id)
            .map(|v| *v.value())
            .unwrap_or(0)
    }

    /// Sorted ids of nodes carrying `label`
    pub fn nodes_with_label(&self, label: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .labels
            .get(label)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Sorted ids of edges incident to `node_id`
    pub fn edges_of(&self, node_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .adjacency
            .get(node_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Apply a batch of node and edge writes with one version
    ///
    /// Nodes are written before edges so that endpoint indices are in place.
    pub fn write_batch(&self, nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>, version: u64) {
        let (node_count, edge_count) = (nodes.len(), edges.len());
        for node in nodes {
            self.put_node(node, version);
        }
        for edge in edges {
            self.put_edge(edge, version);
        }
        tracing::trace!(
            target: "larder::storage",
            version,
            nodes = node_count,
            edges = edge_count,
            "applied batch"
        );
    }
}

impl GraphStorage for ShardedStore {
    fn get_node(&self, id: &str) -> LarderResult<Option<Versioned<NodeRecord>>> {
        Ok(self.node(id))
    }

    fn get_edge(&self, id: &str) -> LarderResult<Option<Versioned<EdgeRecord>>> {
        Ok(self.edge(id))
    }

    fn node_ids_with_label(&self, label: &str) -> LarderResult<Vec<String>> {
        Ok(self.nodes_with_label(label))
    }

    fn edge_ids_of(&self, node_id: &str) -> LarderResult<Vec<String>> {
        Ok(self.edges_of(node_id))
    }

    fn adjacency_version(&self, node_id: &str) -> LarderResult<u64> {
        Ok(ShardedStore::adjacency_version(self, node_id))
    }

    fn current_version(&self) -> u64 {
        self.version()
    }

    fn next_version(&self) -> u64 {
        self.allocate_version()
    }

    fn apply_batch(
        &self,
        nodes: Vec<NodeRecord>,
        edges: Vec<EdgeRecord>,
        version: u64,
    ) -> LarderResult<()> {
        self.write_batch(nodes, edges, version);
        Ok(())
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("version", &self.version())
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
