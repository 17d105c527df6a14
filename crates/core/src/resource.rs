//! Resource lifecycle shared by every entity and relationship
//!
//! A resource is live while `deleted` is absent. `deleted` is set at most once
//! and never cleared; `last_modified` never moves backwards.

use crate::error::LarderResult;
use crate::timestamp::Timestamp;
use crate::value::Properties;
use serde::{Deserialize, Serialize};

/// Property name of the creation timestamp
pub const CREATED: &str = "created";
/// Property name of the last-modification timestamp
pub const LAST_MODIFIED: &str = "lastModified";
/// Property name of the soft-deletion timestamp
pub const DELETED: &str = "deleted";

/// Timestamp bookkeeping mixed into entities and relationships
///
/// `created` is `None` only on values that have not been persisted yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Set once, when the record is first persisted
    pub created: Option<Timestamp>,
    /// Set on every mutation after creation
    pub last_modified: Option<Timestamp>,
    /// Set when soft-deleted
    pub deleted: Option<Timestamp>,
}

impl Resource {
    /// Resource for a record persisted at `now`
    pub fn created_at(now: Timestamp) -> Self {
        Resource {
            created: Some(now),
            last_modified: None,
            deleted: None,
        }
    }

    /// True while the record is not soft-deleted
    #[inline]
    pub fn is_live(&self) -> bool {
        self.deleted.is_none()
    }

    /// Record a mutation at `now`. `last_modified` never decreases.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_modified = Some(match self.last_modified {
            Some(prev) => prev.max(now),
            None => now,
        });
    }

    /// Soft-delete at `now`.
    ///
    /// Returns `false` (and leaves the original timestamp) if already deleted.
    pub fn soft_delete(&mut self, now: Timestamp) -> bool {
        if self.deleted.is_some() {
            return false;
        }
        self.deleted = Some(now);
        true
    }

    /// Encode as stored properties
    pub fn to_properties(&self) -> Properties {
        Properties::new()
            .with_opt(CREATED, self.created)
            .with_opt(LAST_MODIFIED, self.last_modified)
            .with_opt(DELETED, self.deleted)
    }

    /// Decode from stored properties
    pub fn from_properties(record_id: &str, props: &Properties) -> LarderResult<Self> {
        Ok(Resource {
            created: props.opt_timestamp(record_id, CREATED)?,
            last_modified: props.opt_timestamp(record_id, LAST_MODIFIED)?,
            deleted: props.opt_timestamp(record_id, DELETED)?,
        })
    }
}

/// Visibility predicate applied to every stored node and edge read.
#[inline]
pub fn is_live(props: &Properties) -> bool {
    !props.contains(DELETED)
}

/// Apply a `touch` directly to a stored property map.
pub fn touch_properties(props: &mut Properties, now: Timestamp) {
    let next = match props.get(LAST_MODIFIED) {
        Some(crate::value::PropertyValue::Timestamp(prev)) => (*prev).max(now),
        _ => now,
    };
    props.set(LAST_MODIFIED, next);
}

/// Apply a `soft_delete` directly to a stored property map.
///
/// Returns `false` if the record was already deleted.
pub fn soft_delete_properties(props: &mut Properties, now: Timestamp) -> bool {
    if props.contains(DELETED) {
        return false;
    }
    props.set(DELETED, now);
    true
}
