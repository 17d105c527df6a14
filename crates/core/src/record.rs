//! Stored graph records
//!
//! Nodes carry a label set and a property map; edges carry a type, their two
//! endpoints and a property map. Both are addressed by a unique string id.

use crate::resource;
use crate::value::Properties;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A labeled node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique id
    pub id: String,
    /// Type labels (e.g. `Recipe`, `Resource`)
    pub labels: BTreeSet<String>,
    /// Attributes, including resource timestamps
    pub properties: Properties,
}

impl NodeRecord {
    /// Create a node with the given labels
    pub fn new<S: AsRef<str>>(id: impl Into<String>, labels: &[S], properties: Properties) -> Self {
        NodeRecord {
            id: id.into(),
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            properties,
        }
    }

    /// True if the node carries `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// True while the node is not soft-deleted
    pub fn is_live(&self) -> bool {
        resource::is_live(&self.properties)
    }
}

/// A directed, typed, attributed edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Unique id
    pub id: String,
    /// Edge type (e.g. `CONTAINS_INGREDIENT`)
    pub edge_type: String,
    /// Source node id
    pub src: String,
    /// Destination node id
    pub dst: String,
    /// Attributes, including resource timestamps
    pub properties: Properties,
}

impl EdgeRecord {
    /// Create an edge
    pub fn new(
        id: impl Into<String>,
        edge_type: impl Into<String>,
        src: impl Into<String>,
        dst: impl Into<String>,
        properties: Properties,
    ) -> Self {
        EdgeRecord {
            id: id.into(),
            edge_type: edge_type.into(),
            src: src.into(),
            dst: dst.into(),
            properties,
        }
    }

    /// True while the edge is not soft-deleted
    pub fn is_live(&self) -> bool {
        resource::is_live(&self.properties)
    }

    /// True if `node_id` is either endpoint
    pub fn touches(&self, node_id: &str) -> bool {
        self.src == node_id || self.dst == node_id
    }
}

/// A record together with the commit version that last wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// The record
    pub value: T,
    /// Commit version (starts at 1; 0 means "absent")
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Wrap a value
    pub fn new(value: T, version: u64) -> Self {
        Versioned { value, version }
    }
}

/// Address of a stored record, used for read-set tracking
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    /// A node id
    Node(String),
    /// An edge id
    Edge(String),
    /// The set of edges incident to a node id
    Adjacency(String),
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::Node(id) => write!(f, "node {}", id),
            RecordKey::Edge(id) => write!(f, "edge {}", id),
            RecordKey::Adjacency(id) => write!(f, "adjacency of {}", id),
        }
    }
}
