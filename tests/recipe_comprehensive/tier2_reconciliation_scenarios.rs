//! Tier 2: Reconciliation scenarios
//!
//! Each test updates a persisted recipe with a new desired ingredient list and
//! checks both the returned aggregate and the edges actually written.

use crate::test_utils::*;
use larderdb::{LarderError, Recipe};

fn ids(recipe: &Recipe) -> Vec<&str> {
    let mut ids = recipe.ingredient_ids();
    ids.sort();
    ids
}

#[test]
fn add_remove_keep() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let b = k.ingredient("b");
    let c = k.ingredient("c");
    let recipe = k.recipe("abc", &[(&a, "g", 1), (&b, "g", 2)]);
    let before = k.live_edge_versions(&recipe.id);

    let mut next = recipe.clone();
    next.ingredients = desired(&[(&b, "g", 2), (&c, "g", 3)]);
    let updated = k.recipes.update(next).unwrap();

    let mut expected = vec![b.as_str(), c.as_str()];
    expected.sort();
    assert_eq!(ids(&updated), expected);

    let after = k.live_edge_versions(&recipe.id);
    // kept, unchanged: same edge, never rewritten
    assert_eq!(after[&b], before[&b]);
    // removed: no live edge remains
    assert!(!after.contains_key(&a));
    // added: new edge
    assert!(after.contains_key(&c));
    // the removed edge is soft-deleted, not erased
    assert_eq!(k.all_edges(&recipe.id).len(), 3);
}

#[test]
fn attribute_only_change_updates_edge_in_place() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let recipe = k.recipe("one", &[(&a, "g", 1)]);
    let (edge_id, _) = k.live_edge_versions(&recipe.id)[&a].clone();

    let mut next = recipe.clone();
    next.ingredients = desired(&[(&a, "kg", 2)]);
    let updated = k.recipes.update(next).unwrap();

    assert_eq!(summary(&updated), vec![(a.clone(), "kg".to_string(), 2)]);
    let rel = updated.ingredient(&a).unwrap();
    assert_eq!(rel.id.as_deref(), Some(edge_id.as_str()));
    assert!(rel.resource.last_modified.is_some());
    assert_eq!(k.all_edges(&recipe.id).len(), 1);
}

#[test]
fn unknown_target_fails_and_leaves_store_untouched() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let recipe = k.recipe("one", &[(&a, "g", 1)]);
    let version = k.db.version();

    let mut next = recipe.clone();
    next.title = "renamed".into();
    next.ingredients = desired(&[(&a, "g", 1), ("grn:tm-food:ingredient:resource:x", "g", 1)]);
    let err = k.recipes.update(next).unwrap_err();

    match err {
        LarderError::UnknownIngredient { ids } => {
            assert_eq!(ids, vec!["grn:tm-food:ingredient:resource:x".to_string()])
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(k.db.version(), version);
    assert_eq!(k.recipes.get_by_id(&recipe.id).unwrap(), Some(recipe));
}

#[test]
fn duplicate_target_fails_and_leaves_store_untouched() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let b = k.ingredient("b");
    let recipe = k.recipe("one", &[(&a, "g", 1)]);
    let version = k.db.version();

    let mut next = recipe.clone();
    next.ingredients = desired(&[(&b, "g", 1), (&b, "g", 2)]);
    let err = k.recipes.update(next).unwrap_err();

    assert!(matches!(err, LarderError::DuplicateIngredient { ref id } if id == &b));
    assert_eq!(k.db.version(), version);
    assert_eq!(k.recipes.get_by_id(&recipe.id).unwrap(), Some(recipe));
}

#[test]
fn identical_desired_set_writes_no_edges() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let b = k.ingredient("b");
    let recipe = k.recipe("two", &[(&a, "g", 1), (&b, "cup", 2)]);
    let before = k.live_edge_versions(&recipe.id);

    let updated = k.recipes.update(recipe.clone()).unwrap();

    assert_eq!(summary(&updated), summary(&recipe));
    assert_eq!(k.live_edge_versions(&recipe.id), before);
    assert_eq!(k.all_edges(&recipe.id).len(), 2);
}

#[test]
fn empty_desired_set_removes_everything() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let b = k.ingredient("b");
    let recipe = k.recipe("two", &[(&a, "g", 1), (&b, "g", 2)]);

    let mut next = recipe.clone();
    next.ingredients.clear();
    let updated = k.recipes.update(next).unwrap();

    assert!(updated.ingredients.is_empty());
    assert!(k.live_edge_versions(&recipe.id).is_empty());
    assert!(k.recipes.get_all().unwrap().iter().any(|r| r.id == recipe.id));
}

#[test]
fn readding_a_removed_ingredient_creates_a_new_edge() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let recipe = k.recipe("one", &[(&a, "g", 1)]);
    let (first_edge, _) = k.live_edge_versions(&recipe.id)[&a].clone();

    let mut without = recipe.clone();
    without.ingredients.clear();
    let without = k.recipes.update(without).unwrap();

    let mut with = without.clone();
    with.ingredients = desired(&[(&a, "g", 1)]);
    let with = k.recipes.update(with).unwrap();

    let (second_edge, _) = k.live_edge_versions(&recipe.id)[&a].clone();
    assert_ne!(first_edge, second_edge);
    assert_eq!(with.ingredient(&a).unwrap().id.as_deref(), Some(second_edge.as_str()));
    assert_eq!(k.all_edges(&recipe.id).len(), 2);
}

#[test]
fn scalar_fields_are_replaced() {
    let k = Kitchen::new();
    let recipe = k
        .recipes
        .create(Recipe::new("draft").with_description("tbd").with_steps(["one"]))
        .unwrap();

    let mut next = recipe.clone();
    next.title = "final".into();
    next.description = None;
    next.steps = vec!["first".into(), "second".into()];
    let updated = k.recipes.update(next).unwrap();

    assert_eq!(updated.title, "final");
    assert_eq!(updated.description, None);
    assert_eq!(updated.steps, vec!["first", "second"]);
    assert_eq!(updated.resource.created, recipe.resource.created);
}

#[test]
fn update_of_deleted_recipe_is_not_found() {
    let k = Kitchen::new();
    let recipe = k.recipe("gone", &[]);
    k.recipes.delete(&recipe.id).unwrap();

    assert!(k.recipes.update(recipe).unwrap_err().is_not_found());
}
