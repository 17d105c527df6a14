//! Core storage trait
//!
//! `GraphStorage` is the committed-state side of the backing store contract:
//! versioned lookups by id, label and adjacency scans, and atomic application
//! of a transaction's write set. Each node's adjacency carries its own version
//! so that edge scans can be validated like record reads. Transactions (buffering, read-set validation)
//! are layered on top in `larder-concurrency`, so any implementation of this
//! trait can back the entity layer.

use crate::error::LarderResult;
use crate::record::{EdgeRecord, NodeRecord, RecordKey, Versioned};

/// Committed graph state
///
/// Thread safety: all methods must be safe to call concurrently.
/// Reads return records regardless of soft-deletion; visibility filtering
/// is the caller's job.
pub trait GraphStorage: Send + Sync {
    /// Latest committed version of a node
    fn get_node(&self, id: &str) -> LarderResult<Option<Versioned<NodeRecord>>>;

    /// Latest committed version of an edge
    fn get_edge(&self, id: &str) -> LarderResult<Option<Versioned<EdgeRecord>>>;

    /// Ids of all nodes carrying `label`, sorted
    fn node_ids_with_label(&self, label: &str) -> LarderResult<Vec<String>>;

    /// Ids of all edges incident to `node_id` (either direction), sorted
    fn edge_ids_of(&self, node_id: &str) -> LarderResult<Vec<String>>;

    /// Version of the last commit that linked a new edge to `node_id`; 0 if none
    fn adjacency_version(&self, node_id: &str) -> LarderResult<u64>;

    /// Highest version assigned so far
    fn current_version(&self) -> u64;

    /// Allocate the next commit version
    fn next_version(&self) -> u64;

    /// Write every record of a committed transaction with one version
    ///
    /// Callers must hold exclusive commit access while applying.
    fn apply_batch(
        &self,
        nodes: Vec<NodeRecord>,
        edges: Vec<EdgeRecord>,
        version: u64,
    ) -> LarderResult<()>;

    /// Current version of a record; 0 if it does not exist
    fn version_of(&self, key: &RecordKey) -> LarderResult<u64> {
        Ok(match key {
            RecordKey::Node(id) => self.get_node(id)?.map(|v| v.version).unwrap_or(0),
            RecordKey::Edge(id) => self.get_edge(id)?.map(|v| v.version).unwrap_or(0),
            RecordKey::Adjacency(id) => self.adjacency_version(id)?,
        })
    }
}
