//! Shared fixtures for the comprehensive suite

#![allow(dead_code)]

use larder_core::record::EdgeRecord;
use larder_core::CONTAINS_INGREDIENT;
use larderdb::{
    ContainsIngredient, Database, FoodStore, Ingredient, IngredientStore, LarderConfig, Recipe,
    RecipeRepository,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Install a log formatter when `RUST_LOG` is set
pub fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_some() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// A database with every store attached
pub struct Kitchen {
    pub db: Arc<Database>,
    pub foods: FoodStore,
    pub ingredients: IngredientStore,
    pub recipes: RecipeRepository,
}

impl Kitchen {
    pub fn new() -> Self {
        Self::with_db(Database::in_memory())
    }

    pub fn with_config(config: LarderConfig) -> Self {
        Self::with_db(Database::open(config).unwrap())
    }

    fn with_db(db: Arc<Database>) -> Self {
        init_tracing();
        Kitchen {
            foods: FoodStore::new(db.clone()),
            ingredients: IngredientStore::new(db.clone()),
            recipes: RecipeRepository::new(db.clone()),
            db,
        }
    }

    /// Create an ingredient and return its id
    pub fn ingredient(&self, name: &str) -> String {
        self.ingredients.create(Ingredient::new(name)).unwrap().id
    }

    /// Create a recipe with `(ingredient id, unit, amount)` entries
    pub fn recipe(&self, title: &str, items: &[(&str, &str, i64)]) -> Recipe {
        self.recipes
            .create(Recipe::new(title).with_ingredients(desired(items)))
            .unwrap()
    }

    /// Every stored CONTAINS_INGREDIENT edge of a recipe, live or not
    pub fn all_edges(&self, recipe_id: &str) -> Vec<EdgeRecord> {
        let store = self.db.storage();
        store
            .edges_of(recipe_id)
            .iter()
            .filter_map(|id| store.edge(id))
            .map(|v| v.value)
            .filter(|e| e.src == recipe_id && e.edge_type == CONTAINS_INGREDIENT)
            .collect()
    }

    /// Live edges of a recipe keyed by target: (edge id, commit version)
    pub fn live_edge_versions(&self, recipe_id: &str) -> BTreeMap<String, (String, u64)> {
        let store = self.db.storage();
        store
            .edges_of(recipe_id)
            .iter()
            .filter_map(|id| store.edge(id))
            .filter(|v| v.value.src == recipe_id && v.value.is_live())
            .map(|v| (v.value.dst.clone(), (v.value.id.clone(), v.version)))
            .collect()
    }
}

/// Desired relationship list from `(ingredient id, unit, amount)` entries
pub fn desired(items: &[(&str, &str, i64)]) -> Vec<ContainsIngredient> {
    items
        .iter()
        .map(|(id, unit, amount)| ContainsIngredient::new(*id, *unit, *amount))
        .collect()
}

/// `(target, unit, amount)` view of an aggregate's ingredients, sorted
pub fn summary(recipe: &Recipe) -> Vec<(String, String, i64)> {
    let mut items: Vec<_> = recipe
        .ingredients
        .iter()
        .map(|ci| (ci.target_id.clone(), ci.unit.clone(), ci.amount))
        .collect();
    items.sort();
    items
}
