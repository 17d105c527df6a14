//! Tier 4: Property-based reconciliation invariants
//!
//! A recipe is driven through a random sequence of desired ingredient lists.
//! After every update the live relationship set must equal the desired list,
//! with at most one live edge per ingredient, and relationships that did not
//! change must not have been rewritten.

use crate::test_utils::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

const POOL: usize = 6;

/// Desired list as `pool index → (unit, amount)`
fn desired_set() -> impl Strategy<Value = BTreeMap<usize, (&'static str, i64)>> {
    prop::collection::btree_map(
        0..POOL,
        (prop::sample::select(vec!["g", "ml", "cup"]), 1i64..4),
        0..=POOL,
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, failure_persistence: None, ..ProptestConfig::default() })]

    #[test]
    fn live_set_tracks_desired_set(steps in prop::collection::vec(desired_set(), 1..6)) {
        let k = Kitchen::new();
        let pool: Vec<String> = (0..POOL).map(|i| k.ingredient(&format!("i{}", i))).collect();
        let mut recipe = k.recipe("driven", &[]);

        for step in steps {
            let before = k.live_edge_versions(&recipe.id);
            let previous: BTreeMap<String, (String, i64)> = recipe
                .ingredients
                .iter()
                .map(|ci| (ci.target_id.clone(), (ci.unit.clone(), ci.amount)))
                .collect();

            let items: Vec<(&str, &str, i64)> = step
                .iter()
                .map(|(i, (unit, amount))| (pool[*i].as_str(), *unit, *amount))
                .collect();
            recipe.ingredients = desired(&items);
            recipe = k.recipes.update(recipe).unwrap();

            let mut expected: Vec<(String, String, i64)> = items
                .iter()
                .map(|(id, unit, amount)| (id.to_string(), unit.to_string(), *amount))
                .collect();
            expected.sort();
            prop_assert_eq!(summary(&recipe), expected);

            let after = k.live_edge_versions(&recipe.id);
            prop_assert_eq!(after.len(), items.len());

            for (target, attrs) in &previous {
                let unchanged = items
                    .iter()
                    .any(|(id, unit, amount)| id == target && (unit.to_string(), *amount) == *attrs);
                if unchanged {
                    prop_assert_eq!(after.get(target), before.get(target));
                }
            }
        }
    }
}
