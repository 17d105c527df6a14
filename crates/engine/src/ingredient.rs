//! Ingredient persistence
//!
//! Typed facade over [`EntityStore<Ingredient>`] for ingredients recipes can reference.

use crate::database::Database;
use crate::entity::EntityStore;
use larder_core::{Ingredient, LarderResult};
use std::sync::Arc;

/// Ingredient lifecycle operations
#[derive(Debug, Clone)]
pub struct IngredientStore {
    inner: EntityStore<Ingredient>,
}

impl IngredientStore {
    /// Create a store over `db`
    pub fn new(db: Arc<Database>) -> Self {
        IngredientStore {
            inner: EntityStore::new(db),
        }
    }

    /// Every live ingredient, ordered by id
    pub fn get_all(&self) -> LarderResult<Vec<Ingredient>> {
        self.inner.get_all()
    }

    /// A live ingredient by id
    pub fn get_by_id(&self, id: &str) -> LarderResult<Option<Ingredient>> {
        self.inner.get_by_id(id)
    }

    /// Persist a new ingredient
    pub fn create(&self, ingredient: Ingredient) -> LarderResult<Ingredient> {
        self.inner.create(ingredient)
    }

    /// Rename a live ingredient
    pub fn update(&self, ingredient: Ingredient) -> LarderResult<Ingredient> {
        self.inner.update(ingredient)
    }

    /// Soft-delete an ingredient
    ///
    /// Every live recipe relationship pointing at it is deleted with the same
    /// timestamp, so recipes stop listing it.
    pub fn delete(&self, id: &str) -> LarderResult<String> {
        self.inner.delete(id)
    }

    /// Generic store, for use inside a caller's transaction
    pub fn entities(&self) -> &EntityStore<Ingredient> {
        &self.inner
    }
}
