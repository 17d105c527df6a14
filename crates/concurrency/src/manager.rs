//! Transaction manager for coordinating commits
//!
//! ## Commit Gate
//!
//! A `parking_lot::RwLock<()>` separates transaction bodies from commits.
//! [`TransactionManager::run`] holds the gate shared while the closure
//! executes, so every read inside one body sees a single committed state.
//! [`TransactionManager::commit`] holds it exclusively while validating and
//! applying, so a write set becomes visible all at once.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. mark_validating()           Active → Validating
//! 2. validate_read_set()         only with conflict detection enabled
//! 3. IF conflicts: mark_aborted() and return CommitError::ValidationFailed
//!    (a failed version lookup aborts with CommitError::ReadFailed)
//! 4. next_version()              one version for the whole write set
//! 5. apply_batch()               write set becomes visible
//! 6. mark_committed()            Validating → Committed
//! ```
//!
//! Transaction bodies must not start another transaction on the same manager.

use crate::transaction::{CommitError, TransactionContext};
use crate::validation::validate_read_set;
use larder_core::traits::GraphStorage;
use larder_core::LarderResult;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Manages transaction lifecycle and atomic commits
pub struct TransactionManager {
    store: Arc<dyn GraphStorage>,
    gate: RwLock<()>,
    next_txn_id: AtomicU64,
    conflict_detection: bool,
}

impl TransactionManager {
    /// Create a manager over `store`
    ///
    /// With `conflict_detection` off, commits skip read-set validation and
    /// the last committer silently wins.
    pub fn new(store: Arc<dyn GraphStorage>, conflict_detection: bool) -> Self {
        TransactionManager {
            store,
            gate: RwLock::new(()),
            next_txn_id: AtomicU64::new(1),
            conflict_detection,
        }
    }

    /// Whether commits validate the read set
    pub fn conflict_detection(&self) -> bool {
        self.conflict_detection
    }

    /// Storage this manager commits to
    pub fn store(&self) -> &Arc<dyn GraphStorage> {
        &self.store
    }

    /// Current committed version
    pub fn current_version(&self) -> u64 {
        self.store.current_version()
    }

    /// Start a transaction without taking the gate
    ///
    /// Reads are not isolated from concurrent commits; use [`Self::run`]
    /// unless the interleaving is being controlled by the caller.
    pub fn begin(&self) -> TransactionContext {
        let txn_id = self.next_txn_id.fetch_add(1, Ordering::SeqCst);
        TransactionContext::new(txn_id, Arc::clone(&self.store))
    }

    /// Run `f` in a transaction and commit it
    ///
    /// An `Err` from `f` aborts the transaction (nothing is written) and is
    /// returned unchanged. A commit failure is returned as a store error.
    pub fn run<F, T>(&self, f: F) -> LarderResult<T>
    where
        F: FnOnce(&mut TransactionContext) -> LarderResult<T>,
    {
        let mut txn = self.begin();
        let result = {
            let _shared = self.gate.read();
            f(&mut txn)
        };

        match result {
            Ok(value) => {
                self.commit(&mut txn)?;
                Ok(value)
            }
            Err(e) => {
                if txn.is_active() {
                    txn.mark_aborted(e.to_string())?;
                }
                tracing::debug!(
                    target: "larder::txn",
                    txn_id = txn.txn_id,
                    error = %e,
                    "transaction aborted"
                );
                Err(e)
            }
        }
    }

    /// Validate and apply a transaction
    ///
    /// Returns the commit version. Read-only transactions commit without
    /// allocating a version.
    pub fn commit(&self, txn: &mut TransactionContext) -> Result<u64, CommitError> {
        txn.mark_validating()
            .map_err(|e| CommitError::InvalidState(e.to_string()))?;

        if txn.is_read_only() {
            txn.mark_committed()
                .map_err(|e| CommitError::InvalidState(e.to_string()))?;
            return Ok(self.store.current_version());
        }

        let _exclusive = self.gate.write();

        if self.conflict_detection {
            let validation = match validate_read_set(&txn.read_set, self.store.as_ref()) {
                Ok(validation) => validation,
                Err(e) => {
                    tracing::warn!(
                        target: "larder::txn",
                        txn_id = txn.txn_id,
                        error = %e,
                        "read set could not be validated, transaction aborted"
                    );
                    txn.mark_aborted(format!("validation read failed: {}", e))
                        .map_err(|e| CommitError::InvalidState(e.to_string()))?;
                    return Err(CommitError::ReadFailed(e));
                }
            };
            if !validation.is_valid() {
                tracing::warn!(
                    target: "larder::txn",
                    txn_id = txn.txn_id,
                    conflicts = validation.conflict_count(),
                    first = %validation.conflicts[0],
                    "commit conflict, transaction aborted"
                );
                txn.mark_aborted(format!(
                    "validation failed: {} conflict(s)",
                    validation.conflict_count()
                ))
                .map_err(|e| CommitError::InvalidState(e.to_string()))?;
                return Err(CommitError::ValidationFailed(validation));
            }
        }

        let (nodes, edges) = txn.take_writes();
        let version = self.store.next_version();
        if let Err(e) = self.store.apply_batch(nodes, edges, version) {
            tracing::warn!(
                target: "larder::txn",
                txn_id = txn.txn_id,
                version,
                error = %e,
                "write set rejected by storage, transaction aborted"
            );
            txn.mark_aborted(format!("apply failed: {}", e))
                .map_err(|e| CommitError::InvalidState(e.to_string()))?;
            return Err(CommitError::Apply(e));
        }
        txn.mark_committed()
            .map_err(|e| CommitError::InvalidState(e.to_string()))?;

        tracing::trace!(
            target: "larder::txn",
            txn_id = txn.txn_id,
            version,
            reads = txn.read_count(),
            "transaction committed"
        );
        Ok(version)
    }

    /// Explicitly abort a transaction, discarding its writes
    pub fn abort(&self, txn: &mut TransactionContext, reason: impl Into<String>) -> LarderResult<()> {
        txn.mark_aborted(reason)
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("version", &self.current_version())
            .field("conflict_detection", &self.conflict_detection)
            .finish()
    }
}
