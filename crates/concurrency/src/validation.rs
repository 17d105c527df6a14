//! Transaction validation for OCC
//!
//! Rules:
//! - First-committer-wins based on the READ-SET, not the write-set
//! - Blind writes (write without read) do NOT conflict
//! - Write skew is allowed
//!
//! A record that did not exist when read is recorded at version 0; if it
//! exists at commit time that is a conflict too.

use larder_core::record::RecordKey;
use larder_core::traits::GraphStorage;
use larder_core::LarderResult;
use std::collections::HashMap;
use std::fmt;

/// Types of conflicts that can occur during transaction validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Record was read at one version but its current version differs
    ReadWriteConflict {
        /// The record that has a conflict
        key: RecordKey,
        /// Version recorded in the read set when read
        read_version: u64,
        /// Current version in storage at validation time
        current_version: u64,
    },
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::ReadWriteConflict {
                key,
                read_version,
                current_version,
            } => write!(
                f,
                "{} read at version {} but now at version {}",
                key, read_version, current_version
            ),
        }
    }
}

/// Result of transaction validation
///
/// Accumulates all conflicts found during validation.
/// A transaction commits only if `is_valid()` returns true.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// All conflicts detected during validation
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// Create a successful validation result (no conflicts)
    pub fn ok() -> Self {
        ValidationResult {
            conflicts: Vec::new(),
        }
    }

    /// Create a validation result with a single conflict
    pub fn conflict(conflict: ConflictType) -> Self {
        ValidationResult {
            conflicts: vec![conflict],
        }
    }

    /// Check if validation passed (no conflicts)
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Get the number of conflicts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Keys involved in conflicts, sorted
    pub fn conflicting_keys(&self) -> Vec<&RecordKey> {
        let mut keys: Vec<&RecordKey> = self
            .conflicts
            .iter()
            .map(|c| match c {
                ConflictType::ReadWriteConflict { key, .. } => key,
            })
            .collect();
        keys.sort();
        keys
    }
}

/// Validate the read set against current storage state
///
/// For each record in `read_set`, compare the recorded version with the
/// current one and report a `ReadWriteConflict` on mismatch.
///
/// # Errors
///
/// The first storage error raised while looking up a version.
pub fn validate_read_set<S: GraphStorage + ?Sized>(
    read_set: &HashMap<RecordKey, u64>,
    store: &S,
) -> LarderResult<ValidationResult> {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = store.version_of(key)?;

        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    Ok(result)
}
