//! Larder: graph-backed persistence for recipes, ingredients and foods
//!
//! ```ignore
//! use larderdb::{Database, IngredientStore, RecipeRepository, Recipe, ContainsIngredient, Ingredient};
//!
//! let db = Database::in_memory();
//! let ingredients = IngredientStore::new(db.clone());
//! let recipes = RecipeRepository::new(db.clone());
//!
//! let flour = ingredients.create(Ingredient::new("flour"))?;
//! let bread = recipes.create(
//!     Recipe::new("bread").with_ingredients(vec![ContainsIngredient::new(&flour.id, "g", 500)]),
//! )?;
//! ```
//!
//! Internal crates:
//! - `larder-core`: entities, errors, ids, the storage trait
//! - `larder-storage`: sharded in-memory graph store
//! - `larder-concurrency`: OCC transactions
//! - `larder-engine`: entity stores and the recipe repository

#![warn(missing_docs)]

pub mod types;

pub use types::*;
