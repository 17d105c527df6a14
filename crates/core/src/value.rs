//! Property values stored on graph nodes and edges
//!
//! The graph store is loosely typed: every node and edge carries a map of
//! named properties. Entity mapping code reads them back through the typed
//! accessors on [`Properties`], which report a corrupt record instead of
//! panicking when a property is missing or mistyped.

use crate::error::{LarderError, LarderResult};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single property value
///
/// Different variants are never equal: `Int(1) != String("1")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    String(String),
    /// Ordered list of strings
    StringList(Vec<String>),
    /// Point in time
    Timestamp(Timestamp),
}

impl PropertyValue {
    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "int",
            PropertyValue::String(_) => "string",
            PropertyValue::StringList(_) => "string list",
            PropertyValue::Timestamp(_) => "timestamp",
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        PropertyValue::StringList(v)
    }
}

impl From<Timestamp> for PropertyValue {
    fn from(v: Timestamp) -> Self {
        PropertyValue::Timestamp(v)
    }
}

/// Named property map of a node or edge
///
/// Ordered so that records print and compare deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    /// Create an empty property map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert only when `value` is `Some`
    pub fn with_opt(mut self, name: &str, value: Option<impl Into<PropertyValue>>) -> Self {
        if let Some(v) = value {
            self.set(name, v);
        }
        self
    }

    /// Set a property, replacing any previous value
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Remove a property
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.0.remove(name)
    }

    /// Raw lookup
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// True if the property is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Merge `other` into `self`; properties in `other` win.
    pub fn merge(&mut self, other: Properties) {
        self.0.extend(other.0);
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no properties
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    /// Required string property
    pub fn string(&self, record_id: &str, name: &str) -> LarderResult<String> {
        match self.required(record_id, name)? {
            PropertyValue::String(s) => Ok(s.clone()),
            other => Err(mistyped(record_id, name, "string", other)),
        }
    }

    /// Optional string property
    pub fn opt_string(&self, record_id: &str, name: &str) -> LarderResult<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(PropertyValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mistyped(record_id, name, "string", other)),
        }
    }

    /// Required integer property
    pub fn int(&self, record_id: &str, name: &str) -> LarderResult<i64> {
        match self.required(record_id, name)? {
            PropertyValue::Int(v) => Ok(*v),
            other => Err(mistyped(record_id, name, "int", other)),
        }
    }

    /// String list property; absent reads as empty
    pub fn string_list(&self, record_id: &str, name: &str) -> LarderResult<Vec<String>> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(PropertyValue::StringList(v)) => Ok(v.clone()),
            Some(other) => Err(mistyped(record_id, name, "string list", other)),
        }
    }

    /// Optional timestamp property
    pub fn opt_timestamp(&self, record_id: &str, name: &str) -> LarderResult<Option<Timestamp>> {
        match self.get(name) {
            None => Ok(None),
            Some(PropertyValue::Timestamp(ts)) => Ok(Some(*ts)),
            Some(other) => Err(mistyped(record_id, name, "timestamp", other)),
        }
    }

    fn required(&self, record_id: &str, name: &str) -> LarderResult<&PropertyValue> {
        self.get(name).ok_or_else(|| {
            LarderError::corrupt_record(record_id, format!("missing property '{}'", name))
        })
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Properties(iter.into_iter().collect())
    }
}

fn mistyped(record_id: &str, name: &str, expected: &str, found: &PropertyValue) -> LarderError {
    LarderError::corrupt_record(
        record_id,
        format!(
            "property '{}' should be {}, found {}",
            name,
            expected,
            found.type_name()
        ),
    )
}
