//! Recipe aggregates
//!
//! A recipe is a `Recipe` node plus its live `CONTAINS_INGREDIENT` edges.
//! `RecipeRepository` persists the whole aggregate: every operation runs in
//! one transaction, validation failures are raised before any write, and an
//! update changes only the edges whose membership or attributes differ.

use crate::database::Database;
use crate::entity::EntityStore;
use crate::reconcile::reconcile;
use crate::relationship::live_relationships;
use larder_concurrency::TransactionContext;
use larder_core::{
    LarderError, LarderResult, Recipe, Timestamp, CONTAINS_INGREDIENT,
    CONTAINS_INGREDIENT_LABELS, RECIPE_LABEL,
};
use std::sync::Arc;

/// Persistence for recipe aggregates
///
/// # Example
///
/// ```ignore
/// let recipes = RecipeRepository::new(db.clone());
/// let recipe = recipes.create(
///     Recipe::new("pancakes").with_ingredients(vec![ContainsIngredient::new(&flour.id, "g", 200)]),
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    db: Arc<Database>,
    recipes: EntityStore<Recipe>,
}

impl RecipeRepository {
    /// Create a repository over `db`
    pub fn new(db: Arc<Database>) -> Self {
        RecipeRepository {
            recipes: EntityStore::new(db.clone()),
            db,
        }
    }

    /// Every live recipe with its live ingredients, ordered by id
    pub fn get_all(&self) -> LarderResult<Vec<Recipe>> {
        self.db.transaction(|txn| self.get_all_in(txn))
    }

    /// A live recipe with its live ingredients
    pub fn get_by_id(&self, id: &str) -> LarderResult<Option<Recipe>> {
        self.db.transaction(|txn| self.get_by_id_in(txn, id))
    }

    /// Persist a new recipe and its ingredient relationships
    ///
    /// # Errors
    ///
    /// `DuplicateIngredient`, `UnknownIngredient`, or a store error. Nothing
    /// is written on failure.
    pub fn create(&self, recipe: Recipe) -> LarderResult<Recipe> {
        self.db.transaction(|txn| self.create_in(txn, recipe))
    }

    /// Replace a recipe's scalar fields and reconcile its ingredients
    ///
    /// # Errors
    ///
    /// `NotFound`, `DuplicateIngredient`, `UnknownIngredient`, or a store
    /// error (including a concurrent-update conflict). Nothing is written on
    /// failure.
    pub fn update(&self, recipe: Recipe) -> LarderResult<Recipe> {
        self.db.transaction(|txn| self.update_in(txn, recipe))
    }

    /// Soft-delete a recipe and its relationships
    pub fn delete(&self, id: &str) -> LarderResult<String> {
        self.db.transaction(|txn| self.delete_in(txn, id))
    }

    /// [`Self::get_all`] inside `txn`
    pub fn get_all_in(&self, txn: &mut TransactionContext) -> LarderResult<Vec<Recipe>> {
        let mut recipes = self.recipes.get_all_in(txn)?;
        for recipe in &mut recipes {
            recipe.ingredients = live_relationships(txn, &recipe.id)?;
        }
        tracing::debug!(target: "larder::recipe", count = recipes.len(), "get_all");
        Ok(recipes)
    }

    /// [`Self::get_by_id`] inside `txn`
    pub fn get_by_id_in(
        &self,
        txn: &mut TransactionContext,
        id: &str,
    ) -> LarderResult<Option<Recipe>> {
        let Some(mut recipe) = self.recipes.get_by_id_in(txn, id)? else {
            tracing::debug!(target: "larder::recipe", recipe_id = %id, found = false, "get_by_id");
            return Ok(None);
        };
        recipe.ingredients = live_relationships(txn, id)?;
        tracing::debug!(
            target: "larder::recipe",
            recipe_id = %id,
            found = true,
            ingredients = recipe.ingredients.len(),
            "get_by_id"
        );
        Ok(Some(recipe))
    }

    /// [`Self::create`] inside `txn`
    pub fn create_in(&self, txn: &mut TransactionContext, recipe: Recipe) -> LarderResult<Recipe> {
        let plan = reconcile(txn, &[], &recipe.ingredients)?;
        let now = Timestamp::now();
        let created = self.recipes.create_at(txn, recipe, now)?;
        txn.apply_edge_mutations(
            &created.id,
            CONTAINS_INGREDIENT,
            &CONTAINS_INGREDIENT_LABELS,
            &plan.mutations(),
            now,
        )?;

        tracing::debug!(
            target: "larder::recipe",
            recipe_id = %created.id,
            added = plan.added.len(),
            "create"
        );
        self.reassemble(txn, &created.id)
    }

    /// [`Self::update`] inside `txn`
    pub fn update_in(&self, txn: &mut TransactionContext, recipe: Recipe) -> LarderResult<Recipe> {
        let current = self
            .get_by_id_in(txn, &recipe.id)?
            .ok_or_else(|| LarderError::not_found(RECIPE_LABEL, &recipe.id))?;
        let plan = reconcile(txn, &current.ingredients, &recipe.ingredients)?;

        let now = Timestamp::now();
        let updated = self.recipes.update_at(txn, recipe, now)?;
        if !plan.is_empty() {
            txn.apply_edge_mutations(
                &updated.id,
                CONTAINS_INGREDIENT,
                &CONTAINS_INGREDIENT_LABELS,
                &plan.mutations(),
                now,
            )?;
        }

        tracing::debug!(
            target: "larder::recipe",
            recipe_id = %updated.id,
            removed = plan.removed.len(),
            added = plan.added.len(),
            updated = plan.updated.len(),
            kept = plan.kept.len(),
            "update"
        );
        self.reassemble(txn, &updated.id)
    }

    /// [`Self::delete`] inside `txn`
    pub fn delete_in(&self, txn: &mut TransactionContext, id: &str) -> LarderResult<String> {
        let deleted = self.recipes.delete_in(txn, id)?;
        tracing::debug!(target: "larder::recipe", recipe_id = %id, "delete");
        Ok(deleted)
    }

    /// Re-read the aggregate after writes in the same transaction
    fn reassemble(&self, txn: &mut TransactionContext, id: &str) -> LarderResult<Recipe> {
        self.get_by_id_in(txn, id)?
            .ok_or_else(|| LarderError::store(format!("recipe {} vanished during write", id)))
    }
}
