//! Typed edge mutations
//!
//! A reconciliation plan is rendered as a flat list of these records and
//! submitted to the transaction in a single call. Each mutation addresses the
//! owner's live edge by its target node id.

use crate::model::{AMOUNT, UNIT};
use crate::value::Properties;
use std::fmt;

/// One change to an owner's set of outgoing relationships
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum EdgeMutation {
    /// Soft-delete the live edge to `target`
    Remove {
        /// Target node id
        target: String,
    },
    /// Create a new edge to `target`
    Add {
        /// Target node id
        target: String,
        /// Unit of measure
        unit: String,
        /// Quantity
        amount: i64,
    },
    /// Overwrite the attributes of the live edge to `target`
    Update {
        /// Target node id
        target: String,
        /// Unit of measure
        unit: String,
        /// Quantity
        amount: i64,
    },
}

impl EdgeMutation {
    /// Target node id
    pub fn target(&self) -> &str {
        match self {
            EdgeMutation::Remove { target }
            | EdgeMutation::Add { target, .. }
            | EdgeMutation::Update { target, .. } => target,
        }
    }

    /// Attribute properties written by `Add` and `Update`; empty for `Remove`
    pub fn attributes(&self) -> Properties {
        match self {
            EdgeMutation::Remove { .. } => Properties::new(),
            EdgeMutation::Add { unit, amount, .. } | EdgeMutation::Update { unit, amount, .. } => {
                Properties::new().with(UNIT, unit.as_str()).with(AMOUNT, *amount)
            }
        }
    }

    /// Short operation name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            EdgeMutation::Remove { .. } => "remove",
            EdgeMutation::Add { .. } => "add",
            EdgeMutation::Update { .. } => "update",
        }
    }
}

impl fmt::Display for EdgeMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeMutation::Remove { target } => write!(f, "remove {}", target),
            EdgeMutation::Add {
                target,
                unit,
                amount,
            } => write!(f, "add {} ({} {})", target, amount, unit),
            EdgeMutation::Update {
                target,
                unit,
                amount,
            } => write!(f, "update {} ({} {})", target, amount, unit),
        }
    }
}
