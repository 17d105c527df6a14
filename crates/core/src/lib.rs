//! Core types and traits for Larder
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: `LarderError` taxonomy and `LarderResult`
//! - Timestamp: microsecond-precision points in time
//! - Resource: created / lastModified / deleted bookkeeping
//! - Id: label-set-derived resource ids
//! - Properties: loosely typed attribute maps stored on nodes and edges
//! - Records: stored nodes and edges, with versions
//! - Model: Food, Ingredient, Recipe, ContainsIngredient
//! - Mutation: typed edge changes submitted as one batch
//! - Traits: `GraphStorage`, the committed-state store abstraction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod model;
pub mod mutation;
pub mod record;
pub mod resource;
pub mod timestamp;
pub mod traits;
pub mod value;

pub use error::{LarderError, LarderResult};
pub use id::{generate_id, id_prefix, ID_NAMESPACE, ID_SEPARATOR, ID_SUFFIX_LEN};
pub use model::{
    ContainsIngredient, Food, Ingredient, Recipe, AMOUNT, CONTAINS_INGREDIENT,
    CONTAINS_INGREDIENT_LABELS, FOOD_LABEL, INGREDIENT_LABEL, RECIPE_LABEL, RESOURCE_LABEL, UNIT,
};
pub use mutation::EdgeMutation;
pub use record::{EdgeRecord, NodeRecord, RecordKey, Versioned};
pub use resource::Resource;
pub use timestamp::Timestamp;
pub use traits::GraphStorage;
pub use value::{Properties, PropertyValue};
