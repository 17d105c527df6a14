//! Public types for the Larder API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Domain entities
// ============================================================================

pub use larder_core::{ContainsIngredient, Food, Ingredient, Recipe};

// Timestamps and lifecycle
pub use larder_core::{Resource, Timestamp};

// Errors
pub use larder_core::{LarderError, LarderResult};

// ============================================================================
// Database and stores
// ============================================================================

pub use larder_engine::{
    Database, EntityStore, FoodStore, IngredientStore, LarderConfig, RecipeRepository,
    CONFIG_FILE_NAME,
};

// Reconciliation plans (diagnostics)
pub use larder_core::EdgeMutation;
pub use larder_engine::MutationPlan;

// Transactions, for composing operations atomically
pub use larder_concurrency::TransactionContext;
