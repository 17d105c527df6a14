//! Tier 3: Atomicity and concurrent updates

use crate::test_utils::*;
use larderdb::{LarderConfig, LarderError, Recipe, CONFIG_FILE_NAME};
use std::error::Error as _;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn failure_after_writes_rolls_back_everything() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let b = k.ingredient("b");
    let recipe = k.recipe("one", &[(&a, "g", 1)]);
    let before = k.live_edge_versions(&recipe.id);
    let version = k.db.version();

    let result: Result<Recipe, LarderError> = k.db.transaction(|txn| {
        let mut next = recipe.clone();
        next.title = "changed".into();
        next.ingredients = desired(&[(&b, "g", 9)]);
        k.recipes.update_in(txn, next)?;
        Err(LarderError::store("simulated failure after update"))
    });

    assert!(result.is_err());
    assert_eq!(k.db.version(), version);
    assert_eq!(k.live_edge_versions(&recipe.id), before);
    assert_eq!(k.recipes.get_by_id(&recipe.id).unwrap(), Some(recipe));
}

#[test]
fn ingredient_delete_cascades_in_one_commit() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let r1 = k.recipe("r1", &[(&a, "g", 1)]);
    let r2 = k.recipe("r2", &[(&a, "g", 2)]);
    let version = k.db.version();

    k.ingredients.delete(&a).unwrap();

    assert_eq!(k.db.version(), version + 1);
    assert!(k.live_edge_versions(&r1.id).is_empty());
    assert!(k.live_edge_versions(&r2.id).is_empty());
}

/// Run two overlapping updates of the same recipe; both finish reading
/// before either commits.
fn overlapping_updates(k: &Kitchen, recipe: &Recipe, titles: [&str; 2]) -> Vec<Result<Recipe, LarderError>> {
    let barrier = Arc::new(Barrier::new(2));
    thread::scope(|s| {
        let handles: Vec<_> = titles
            .iter()
            .map(|title| {
                let barrier = Arc::clone(&barrier);
                let mut next = recipe.clone();
                next.title = title.to_string();
                s.spawn(move || {
                    k.db.transaction(|txn| {
                        let updated = k.recipes.update_in(txn, next)?;
                        barrier.wait();
                        Ok(updated)
                    })
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn concurrent_updates_of_one_recipe_conflict() {
    let k = Kitchen::new();
    let a = k.ingredient("a");
    let recipe = k.recipe("base", &[(&a, "g", 1)]);

    let results = overlapping_updates(&k, &recipe, ["left", "right"]);

    let winners: Vec<&Recipe> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let losers: Vec<&LarderError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(losers.len(), 1);

    let err = losers[0];
    assert!(matches!(err, LarderError::Store { .. }));
    assert!(err.source().unwrap().to_string().contains("conflict"));

    let stored = k.recipes.get_by_id(&recipe.id).unwrap().unwrap();
    assert_eq!(stored.title, winners[0].title);
}

#[test]
fn conflict_detection_disabled_allows_last_writer_wins() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "conflict_detection = false\n").unwrap();
    let k = Kitchen::with_config(LarderConfig::from_file(&path).unwrap());
    let a = k.ingredient("a");
    let recipe = k.recipe("base", &[(&a, "g", 1)]);

    let results = overlapping_updates(&k, &recipe, ["left", "right"]);

    assert!(results.iter().all(|r| r.is_ok()));
    let stored = k.recipes.get_by_id(&recipe.id).unwrap().unwrap();
    assert!(stored.title == "left" || stored.title == "right");
}

#[test]
fn ingredient_delete_racing_a_new_link_leaves_no_dangling_edge() {
    let k = Kitchen::new();
    let salt = k.ingredient("salt");
    let barrier = Barrier::new(2);

    let (created, deleted) = thread::scope(|s| {
        let adder = s.spawn(|| {
            k.db.transaction(|txn| {
                let recipe = k
                    .recipes
                    .create_in(txn, Recipe::new("brine").with_ingredients(desired(&[(&salt, "g", 30)])))?;
                barrier.wait();
                Ok(recipe)
            })
        });
        let deleter = s.spawn(|| {
            k.db.transaction(|txn| {
                let id = k.ingredients.entities().delete_in(txn, &salt)?;
                barrier.wait();
                // Let the adder reach its commit first
                thread::sleep(Duration::from_millis(100));
                Ok(id)
            })
        });
        (adder.join().unwrap(), deleter.join().unwrap())
    });

    assert_ne!(created.is_ok(), deleted.is_ok());
    let salt_live = k.ingredients.get_by_id(&salt).unwrap().is_some();
    assert_eq!(salt_live, deleted.is_err());

    for recipe in k.recipes.get_all().unwrap() {
        for (target, _) in k.live_edge_versions(&recipe.id) {
            assert!(salt_live, "live edge from {} to deleted {}", recipe.id, target);
        }
    }
    let edges = k.db.storage().edges_of(&salt);
    let live_edges = edges
        .iter()
        .filter_map(|id| k.db.storage().edge(id))
        .filter(|e| e.value.is_live())
        .count();
    assert_eq!(live_edges, usize::from(salt_live && created.is_ok()));
}

#[test]
fn concurrent_creates_are_all_visible() {
    let k = Kitchen::new();
    let a = k.ingredient("a");

    thread::scope(|s| {
        for t in 0..4 {
            let a = a.clone();
            let k = &k;
            s.spawn(move || {
                for i in 0..10 {
                    k.recipe(&format!("r-{}-{}", t, i), &[(&a, "g", i)]);
                }
            });
        }
    });

    let all = k.recipes.get_all().unwrap();
    assert_eq!(all.len(), 40);
    assert!(all.iter().all(|r| r.ingredient_ids() == vec![a.as_str()]));
    let mut sorted = all.clone();
    sorted.sort_by(|x, y| x.id.cmp(&y.id));
    assert_eq!(all, sorted);
}
