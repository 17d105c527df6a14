//! Error types for Larder
//!
//! Every layer reports failures through [`LarderError`]. Validation failures
//! (`NotFound`, `UnknownIngredient`, `DuplicateIngredient`) are raised before
//! any write is buffered, so they never leave partial state behind.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Boxed cause carried by [`LarderError::Store`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for Larder operations
pub type LarderResult<T> = std::result::Result<T, LarderError>;

/// Error taxonomy shared by the store, the entity layer and the applier
#[derive(Debug, Error)]
pub enum LarderError {
    /// Target entity is absent or soft-deleted
    #[error("{label} not found: {id}")]
    NotFound {
        /// Store label of the entity type (e.g. `Recipe`)
        label: String,
        /// Requested id
        id: String,
    },

    /// One or more newly referenced ingredients do not resolve to a live ingredient
    #[error("unknown ingredient(s): {}", .ids.join(", "))]
    UnknownIngredient {
        /// Every unresolved target id, sorted
        ids: Vec<String>,
    },

    /// The desired ingredient list references the same target twice
    #[error("duplicate ingredient in desired set: {id}")]
    DuplicateIngredient {
        /// The repeated target id
        id: String,
    },

    /// Id generation was invoked without any usable label
    #[error("cannot generate an id from an empty label set")]
    EmptyLabelSet,

    /// Transport, transaction or record-format failure in the backing store
    #[error("store error: {message}")]
    Store {
        /// Human-readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedCause>,
    },

    /// Configuration could not be read, parsed or validated
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },
}

impl LarderError {
    /// Build a `NotFound` error.
    pub fn not_found(label: impl Into<String>, id: impl Into<String>) -> Self {
        LarderError::NotFound {
            label: label.into(),
            id: id.into(),
        }
    }

    /// Build a `Store` error without an underlying cause.
    pub fn store(message: impl Into<String>) -> Self {
        LarderError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Build a `Store` error that preserves its cause.
    pub fn store_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LarderError::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// A stored record is missing a property or holds one of the wrong type.
    pub fn corrupt_record(id: &str, detail: impl std::fmt::Display) -> Self {
        LarderError::store(format!("corrupt record {}: {}", id, detail))
    }

    /// Build a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        LarderError::Config {
            message: message.into(),
        }
    }

    /// True for failures detected before any mutation was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LarderError::NotFound { .. }
                | LarderError::UnknownIngredient { .. }
                | LarderError::DuplicateIngredient { .. }
        )
    }

    /// True when the error is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LarderError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_error_display_not_found() {
        let err = LarderError::not_found("Recipe", "grn:tm-food:recipe:abc");
        let msg = err.to_string();
        assert!(msg.contains("Recipe not found"));
        assert!(msg.contains("grn:tm-food:recipe:abc"));
    }

    #[test]
    fn test_error_display_unknown_ingredient_lists_ids() {
        let err = LarderError::UnknownIngredient {
            ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "unknown ingredient(s): a, b");
    }

    #[test]
    fn test_error_display_duplicate() {
        let err = LarderError::DuplicateIngredient { id: "x".into() };
        assert!(err.to_string().contains("duplicate ingredient"));
    }

    #[test]
    fn test_store_error_preserves_source() {
        let cause = io::Error::new(io::ErrorKind::BrokenPipe, "socket closed");
        let err = LarderError::store_with_source("commit failed", cause);
        assert!(err.to_string().contains("commit failed"));
        let source = err.source().expect("source preserved");
        assert!(source.to_string().contains("socket closed"));
    }

    #[test]
    fn test_store_error_without_source() {
        let err = LarderError::store("boom");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_validation_classification() {
        assert!(LarderError::not_found("Food", "1").is_validation());
        assert!(LarderError::UnknownIngredient { ids: vec![] }.is_validation());
        assert!(LarderError::DuplicateIngredient { id: "1".into() }.is_validation());
        assert!(!LarderError::EmptyLabelSet.is_validation());
        assert!(!LarderError::store("x").is_validation());
        assert!(!LarderError::config("x").is_validation());
    }

    #[test]
    fn test_corrupt_record_is_store_error() {
        let err = LarderError::corrupt_record("n1", "missing property 'name'");
        match err {
            LarderError::Store { message, .. } => {
                assert!(message.contains("n1"));
                assert!(message.contains("name"));
            }
            _ => panic!("Wrong error variant"),
        }
    }
}
