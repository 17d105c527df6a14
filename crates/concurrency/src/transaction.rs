//! Transaction context for OCC
//!
//! A `TransactionContext` buffers node and edge writes, records the version
//! of every committed record it reads, and serves reads from its own buffer
//! first (read-your-writes). Nothing reaches storage until the transaction
//! manager commits it.
//!
//! # Lifecycle
//!
//! 1. **BEGIN**: created by `TransactionManager::begin`, status is `Active`
//! 2. **READ/WRITE**: `get_node`, `live_out_edges`, `put_node`, `apply_edge_mutations`, ...
//! 3. **VALIDATE**: `mark_validating`, read set checked against storage
//! 4. **COMMIT/ABORT**: `mark_committed` or `mark_aborted`

use crate::validation::ValidationResult;
use larder_core::record::{EdgeRecord, NodeRecord, RecordKey};
use larder_core::resource::{self, Resource};
use larder_core::traits::GraphStorage;
use larder_core::{generate_id, EdgeMutation, LarderError, LarderResult, Timestamp};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while committing a transaction
#[derive(Debug, Error)]
pub enum CommitError {
    /// Read set no longer matches committed state (first committer won)
    #[error("commit failed: {} conflict(s)", .0.conflict_count())]
    ValidationFailed(ValidationResult),

    /// Transaction was not in the correct state for commit
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Committed versions could not be read during validation
    #[error("validation read failed: {0}")]
    ReadFailed(#[source] LarderError),

    /// Storage rejected the write set
    #[error("apply failed: {0}")]
    Apply(#[source] LarderError),
}

impl From<CommitError> for LarderError {
    fn from(e: CommitError) -> Self {
        let message = match &e {
            CommitError::ValidationFailed(_) => "transaction aborted by concurrent commit",
            CommitError::InvalidState(_) => "transaction not committable",
            CommitError::ReadFailed(_) => "transaction could not be validated",
            CommitError::Apply(_) => "transaction write set could not be applied",
        };
        LarderError::store_with_source(message, e)
    }
}

/// Status of a transaction in its lifecycle
///
/// Terminal states: `Committed`, `Aborted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is executing, can read/write
    Active,
    /// Transaction is being validated for conflicts
    Validating,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// Buffered write set and read set of one transaction
pub struct TransactionContext {
    /// Unique transaction ID
    pub txn_id: u64,
    /// Storage version when the transaction began
    pub start_version: u64,

    store: Arc<dyn GraphStorage>,

    /// Records read from storage and the version first observed
    ///
    /// Version 0 means the record did not exist when read.
    pub read_set: HashMap<RecordKey, u64>,

    node_writes: BTreeMap<String, NodeRecord>,
    edge_writes: BTreeMap<String, EdgeRecord>,

    /// Current transaction status
    pub status: TransactionStatus,
}

impl TransactionContext {
    /// Begin a transaction over `store`
    pub fn new(txn_id: u64, store: Arc<dyn GraphStorage>) -> Self {
        let start_version = store.current_version();
        TransactionContext {
            txn_id,
            start_version,
            store,
            read_set: HashMap::new(),
            node_writes: BTreeMap::new(),
            edge_writes: BTreeMap::new(),
            status: TransactionStatus::Active,
        }
    }

    // ========================================================================
    // Raw reads (no visibility filtering)
    // ========================================================================

    /// Read a node: own writes first, then storage (tracked in the read set)
    pub fn get_node(&mut self, id: &str) -> LarderResult<Option<NodeRecord>> {
        self.ensure_active()?;
        if let Some(node) = self.node_writes.get(id) {
            return Ok(Some(node.clone()));
        }
        let versioned = self.store.get_node(id)?;
        let version = versioned.as_ref().map_or(0, |v| v.version);
        self.read_set
            .entry(RecordKey::Node(id.to_string()))
            .or_insert(version);
        Ok(versioned.map(|v| v.value))
    }

    /// Read an edge: own writes first, then storage (tracked in the read set)
    pub fn get_edge(&mut self, id: &str) -> LarderResult<Option<EdgeRecord>> {
        self.ensure_active()?;
        if let Some(edge) = self.edge_writes.get(id) {
            return Ok(Some(edge.clone()));
        }
        let versioned = self.store.get_edge(id)?;
        let version = versioned.as_ref().map_or(0, |v| v.version);
        self.read_set
            .entry(RecordKey::Edge(id.to_string()))
            .or_insert(version);
        Ok(versioned.map(|v| v.value))
    }

    /// Ids of nodes carrying `label`, including buffered ones, sorted
    pub fn node_ids_with_label(&mut self, label: &str) -> LarderResult<Vec<String>> {
        self.ensure_active()?;
        let mut ids: BTreeSet<String> = self.store.node_ids_with_label(label)?.into_iter().collect();
        for (id, node) in &self.node_writes {
            if node.has_label(label) {
                ids.insert(id.clone());
            } else {
                ids.remove(id);
            }
        }
        Ok(ids.into_iter().collect())
    }

    /// Ids of edges incident to `node_id`, including buffered ones, sorted
    ///
    /// The node's adjacency version is tracked in the read set, so an edge
    /// linked to `node_id` by a concurrent commit invalidates the scan.
    pub fn edge_ids_of(&mut self, node_id: &str) -> LarderResult<Vec<String>> {
        self.ensure_active()?;
        let version = self.store.adjacency_version(node_id)?;
        self.read_set
            .entry(RecordKey::Adjacency(node_id.to_string()))
            .or_insert(version);
        let mut ids: BTreeSet<String> = self.store.edge_ids_of(node_id)?.into_iter().collect();
        ids.extend(
            self.edge_writes
                .values()
                .filter(|e| e.touches(node_id))
                .map(|e| e.id.clone()),
        );
        Ok(ids.into_iter().collect())
    }

    // ========================================================================
    // Visible reads
    // ========================================================================

    /// A live node carrying `label`
    pub fn live_node(&mut self, label: &str, id: &str) -> LarderResult<Option<NodeRecord>> {
        Ok(self
            .get_node(id)?
            .filter(|n| n.has_label(label) && resource::is_live(&n.properties)))
    }

    /// Every live node carrying `label`, ordered by id
    pub fn live_nodes(&mut self, label: &str) -> LarderResult<Vec<NodeRecord>> {
        let mut nodes = Vec::new();
        for id in self.node_ids_with_label(label)? {
            if let Some(node) = self.live_node(label, &id)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    /// Every live edge incident to `node_id`, in either direction
    pub fn live_edges_of(&mut self, node_id: &str) -> LarderResult<Vec<EdgeRecord>> {
        let mut edges = Vec::new();
        for id in self.edge_ids_of(node_id)? {
            if let Some(edge) = self.get_edge(&id)? {
                if resource::is_live(&edge.properties) {
                    edges.push(edge);
                }
            }
        }
        Ok(edges)
    }

    /// Live edges of `edge_type` whose source is `owner_id`
    pub fn live_out_edges(
        &mut self,
        owner_id: &str,
        edge_type: &str,
    ) -> LarderResult<Vec<EdgeRecord>> {
        Ok(self
            .live_edges_of(owner_id)?
            .into_iter()
            .filter(|e| e.src == owner_id && e.edge_type == edge_type)
            .collect())
    }

    /// Which of `ids` are live nodes carrying `label`
    pub fn resolve_live(
        &mut self,
        label: &str,
        ids: &BTreeSet<String>,
    ) -> LarderResult<BTreeSet<String>> {
        let mut resolved = BTreeSet::new();
        for id in ids {
            if self.live_node(label, id)?.is_some() {
                resolved.insert(id.clone());
            }
        }
        Ok(resolved)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Buffer a node write (create or replace)
    pub fn put_node(&mut self, node: NodeRecord) -> LarderResult<()> {
        self.ensure_active()?;
        self.node_writes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Buffer an edge write (create or replace)
    pub fn put_edge(&mut self, edge: EdgeRecord) -> LarderResult<()> {
        self.ensure_active()?;
        self.edge_writes.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Apply a batch of edge mutations to the outgoing `edge_type` edges of
    /// `owner_id`, all stamped with `now`.
    ///
    /// `Remove` and `Update` address the owner's live edge to the target and
    /// fail if there is none. `Add` always creates a new edge with an id
    /// derived from `id_labels`, and fails if a live edge to the target
    /// already exists. Returns the number of mutations applied.
    pub fn apply_edge_mutations<S: AsRef<str>>(
        &mut self,
        owner_id: &str,
        edge_type: &str,
        id_labels: &[S],
        mutations: &[EdgeMutation],
        now: Timestamp,
    ) -> LarderResult<usize> {
        self.ensure_active()?;
        let mut live: BTreeMap<String, EdgeRecord> = self
            .live_out_edges(owner_id, edge_type)?
            .into_iter()
            .map(|e| (e.dst.clone(), e))
            .collect();

        for mutation in mutations {
            match mutation {
                EdgeMutation::Remove { target } => {
                    let mut edge = live
                        .remove(target)
                        .ok_or_else(|| no_live_edge(owner_id, target))?;
                    resource::soft_delete_properties(&mut edge.properties, now);
                    self.put_edge(edge)?;
                }
                EdgeMutation::Update { target, .. } => {
                    let edge = live
                        .get_mut(target)
                        .ok_or_else(|| no_live_edge(owner_id, target))?;
                    edge.properties.merge(mutation.attributes());
                    resource::touch_properties(&mut edge.properties, now);
                    let edge = edge.clone();
                    self.put_edge(edge)?;
                }
                EdgeMutation::Add { target, .. } => {
                    if live.contains_key(target) {
                        return Err(LarderError::store(format!(
                            "{} already has a live {} edge to {}",
                            owner_id, edge_type, target
                        )));
                    }
                    let mut properties = Resource::created_at(now).to_properties();
                    properties.merge(mutation.attributes());
                    let edge = EdgeRecord::new(
                        generate_id(id_labels)?,
                        edge_type,
                        owner_id,
                        target.as_str(),
                        properties,
                    );
                    live.insert(target.clone(), edge.clone());
                    self.put_edge(edge)?;
                }
            }
        }

        tracing::trace!(
            target: "larder::txn",
            txn_id = self.txn_id,
            owner = %owner_id,
            mutations = mutations.len(),
            "buffered edge mutations"
        );
        Ok(mutations.len())
    }

    // ========================================================================
    // State management
    // ========================================================================

    /// Check if transaction is in Active state
    pub fn is_active(&self) -> bool {
        matches!(self.status, TransactionStatus::Active)
    }

    /// Check if transaction is committed
    pub fn is_committed(&self) -> bool {
        matches!(self.status, TransactionStatus::Committed)
    }

    /// Check if transaction is aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Abort reason, if aborted
    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            TransactionStatus::Aborted { reason } => Some(reason),
            _ => None,
        }
    }

    /// Fail unless the transaction can accept operations
    pub fn ensure_active(&self) -> LarderResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(LarderError::store(format!(
                "transaction {} is not active: {:?}",
                self.txn_id, self.status
            )))
        }
    }

    /// `Active` → `Validating`
    pub fn mark_validating(&mut self) -> LarderResult<()> {
        self.ensure_active()?;
        self.status = TransactionStatus::Validating;
        Ok(())
    }

    /// `Validating` → `Committed`
    pub fn mark_committed(&mut self) -> LarderResult<()> {
        match &self.status {
            TransactionStatus::Validating => {
                self.status = TransactionStatus::Committed;
                Ok(())
            }
            _ => Err(LarderError::store(format!(
                "cannot commit transaction {} from state {:?}",
                self.txn_id, self.status
            ))),
        }
    }

    /// Abort and discard every buffered write
    ///
    /// Allowed from `Active` and `Validating`. The read set is kept for
    /// diagnostics.
    pub fn mark_aborted(&mut self, reason: impl Into<String>) -> LarderResult<()> {
        match &self.status {
            TransactionStatus::Committed => Err(LarderError::store(format!(
                "cannot abort committed transaction {}",
                self.txn_id
            ))),
            TransactionStatus::Aborted { .. } => Err(LarderError::store(format!(
                "transaction {} already aborted",
                self.txn_id
            ))),
            _ => {
                self.status = TransactionStatus::Aborted {
                    reason: reason.into(),
                };
                self.node_writes.clear();
                self.edge_writes.clear();
                Ok(())
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of records tracked in the read set
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Number of buffered node and edge writes
    pub fn write_count(&self) -> usize {
        self.node_writes.len() + self.edge_writes.len()
    }

    /// True if nothing has been written
    pub fn is_read_only(&self) -> bool {
        self.write_count() == 0
    }

    /// Drain the buffered write set for application
    pub(crate) fn take_writes(&mut self) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        let nodes = std::mem::take(&mut self.node_writes).into_values().collect();
        let edges = std::mem::take(&mut self.edge_writes).into_values().collect();
        (nodes, edges)
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("txn_id", &self.txn_id)
            .field("start_version", &self.start_version)
            .field("status", &self.status)
            .field("reads", &self.read_count())
            .field("writes", &self.write_count())
            .finish()
    }
}

fn no_live_edge(owner_id: &str, target: &str) -> LarderError {
    LarderError::store(format!("{} has no live edge to {}", owner_id, target))
}
