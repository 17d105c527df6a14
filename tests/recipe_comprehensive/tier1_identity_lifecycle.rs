//! Tier 1: Resource identity and lifecycle

use crate::test_utils::*;
use larder_core::resource::DELETED;
use larder_core::{generate_id, id_prefix};
use larderdb::{Food, Ingredient, LarderError, LarderResult, Recipe, Timestamp};
use std::collections::HashSet;

fn stored_deleted_at(kitchen: &Kitchen, id: &str) -> Option<Timestamp> {
    let node = kitchen.db.storage().node(id).unwrap().value;
    node.properties.opt_timestamp(id, DELETED).unwrap()
}

#[test]
fn ten_thousand_generated_ids_are_distinct() {
    let labels = ["Recipe", "Resource"];
    let prefix = id_prefix(&labels).unwrap();
    let ids: HashSet<String> = (0..10_000).map(|_| generate_id(&labels).unwrap()).collect();

    assert_eq!(ids.len(), 10_000);
    assert!(ids.iter().all(|id| id.starts_with(&prefix)));
}

#[test]
fn label_order_and_case_do_not_change_prefix() {
    assert_eq!(
        id_prefix(&["Resource", "Recipe"]).unwrap(),
        id_prefix(&["recipe", "RESOURCE"]).unwrap()
    );
    assert!(matches!(
        generate_id::<&str>(&[]),
        Err(LarderError::EmptyLabelSet)
    ));
}

#[test]
fn created_entities_get_distinct_ids_per_type() {
    let k = Kitchen::new();
    let food = k.foods.create(Food::new("x")).unwrap();
    let ingredient = k.ingredients.create(Ingredient::new("x")).unwrap();
    let recipe = k.recipes.create(Recipe::new("x")).unwrap();

    assert!(food.id.starts_with("grn:tm-food:food:resource:"));
    assert!(ingredient.id.starts_with("grn:tm-food:ingredient:resource:"));
    assert!(recipe.id.starts_with("grn:tm-food:recipe:resource:"));
}

#[test]
fn soft_delete_is_idempotent_for_every_entity_type() {
    let k = Kitchen::new();
    let food = k.foods.create(Food::new("bread")).unwrap();
    let ingredient = k.ingredients.create(Ingredient::new("yeast")).unwrap();
    let recipe = k.recipe("loaf", &[(&ingredient.id, "g", 7)]);

    let deleters: Vec<(String, Box<dyn Fn(&str) -> LarderResult<String> + '_>)> = vec![
        (food.id.clone(), Box::new(|id: &str| k.foods.delete(id))),
        (recipe.id.clone(), Box::new(|id: &str| k.recipes.delete(id))),
        (ingredient.id.clone(), Box::new(|id: &str| k.ingredients.delete(id))),
    ];

    for (id, delete) in deleters {
        assert_eq!(delete(&id).unwrap(), id);
        let first = stored_deleted_at(&k, &id);
        assert!(first.is_some());

        let version = k.db.version();
        assert_eq!(delete(&id).unwrap(), id);
        assert_eq!(stored_deleted_at(&k, &id), first);
        assert_eq!(k.db.version(), version, "second delete must not write");
    }

    assert!(k.foods.get_all().unwrap().is_empty());
    assert!(k.ingredients.get_all().unwrap().is_empty());
    assert!(k.recipes.get_all().unwrap().is_empty());
}

#[test]
fn delete_of_unknown_id_is_not_found() {
    let k = Kitchen::new();
    let err = k.recipes.delete("grn:tm-food:recipe:resource:missing").unwrap_err();
    assert!(matches!(err, LarderError::NotFound { ref label, .. } if label == "Recipe"));
}

#[test]
fn last_modified_never_decreases_across_updates() {
    let k = Kitchen::new();
    let salt = k.ingredient("salt");
    let mut recipe = k.recipe("brine", &[(&salt, "g", 10)]);
    let mut previous = recipe.resource.created;

    for amount in 11..16 {
        recipe.ingredients = desired(&[(&salt, "g", amount)]);
        recipe = k.recipes.update(recipe).unwrap();
        assert!(recipe.resource.last_modified >= previous);
        previous = recipe.resource.last_modified;
    }
    assert!(recipe.resource.is_live());
}

#[test]
fn aggregate_serializes_with_wire_field_names() {
    let k = Kitchen::new();
    let salt = k.ingredient("salt");
    let recipe = k.recipe("brine", &[(&salt, "g", 10)]);

    let json = serde_json::to_value(&recipe).unwrap();
    assert_eq!(json["title"], "brine");
    assert_eq!(json["ingredients"][0]["ingredient_id"], salt.as_str());
    assert_eq!(json["ingredients"][0]["amount"], 10);
    assert!(json["ingredients"][0]["id"].is_string());
    assert!(json["created"].is_string());
    assert!(json["deleted"].is_null());
}
