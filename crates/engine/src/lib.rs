//! Larder engine
//!
//! Entity persistence and recipe aggregates over the embedded graph store:
//! - [`Database`]: store + transaction manager, configured from `larder.toml`
//! - [`EntityStore`]: generic lifecycle operations for node-backed entities
//! - [`FoodStore`], [`IngredientStore`]: typed facades
//! - [`RecipeRepository`]: recipe aggregates with relationship reconciliation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod entity;
pub mod food;
pub mod ingredient;
pub mod recipe;
pub mod reconcile;
pub mod relationship;

pub use config::{LarderConfig, CONFIG_FILE_NAME};
pub use database::Database;
pub use entity::{Entity, EntityStore};
pub use food::FoodStore;
pub use ingredient::IngredientStore;
pub use recipe::RecipeRepository;
pub use reconcile::{diff, reconcile, validate, MutationPlan};
pub use relationship::{live_relationships, parse_relationship};
