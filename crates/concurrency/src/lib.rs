//! Concurrency layer for Larder
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: buffered writes, read-set tracking, visible reads
//! - Conflict detection at commit time (first-committer-wins)
//! - A commit gate giving transaction bodies a stable view of storage

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod transaction;
pub mod validation;

pub use manager::TransactionManager;
pub use transaction::{CommitError, TransactionContext, TransactionStatus};
pub use validation::{validate_read_set, ConflictType, ValidationResult};
