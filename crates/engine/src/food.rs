//! Food persistence
//!
//! Typed facade over [`EntityStore<Food>`] for generic foods.

use crate::database::Database;
use crate::entity::EntityStore;
use larder_core::{Food, LarderResult};
use std::sync::Arc;

/// Food lifecycle operations
#[derive(Debug, Clone)]
pub struct FoodStore {
    inner: EntityStore<Food>,
}

impl FoodStore {
    /// Create a store over `db`
    pub fn new(db: Arc<Database>) -> Self {
        FoodStore {
            inner: EntityStore::new(db),
        }
    }

    /// Every live food, ordered by id
    pub fn get_all(&self) -> LarderResult<Vec<Food>> {
        self.inner.get_all()
    }

    /// A live food by id
    pub fn get_by_id(&self, id: &str) -> LarderResult<Option<Food>> {
        self.inner.get_by_id(id)
    }

    /// Persist a new food
    pub fn create(&self, food: Food) -> LarderResult<Food> {
        self.inner.create(food)
    }

    /// Rename a live food
    pub fn update(&self, food: Food) -> LarderResult<Food> {
        self.inner.update(food)
    }

    /// Soft-delete a food
    pub fn delete(&self, id: &str) -> LarderResult<String> {
        self.inner.delete(id)
    }

    /// Generic store, for use inside a caller's transaction
    pub fn entities(&self) -> &EntityStore<Food> {
        &self.inner
    }
}
