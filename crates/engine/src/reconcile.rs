//! Relationship reconciliation
//!
//! Given a recipe's live relationships and the caller's desired list, compute
//! the smallest set of edge changes that makes the first equal the second:
//!
//! ```text
//! removed = existing − desired          (soft-delete edge)
//! added   = desired − existing          (new edge, target must be live)
//! kept    = existing ∩ desired
//! updated = kept with changed unit/amount
//! ```
//!
//! Relationships are identified by target id. Kept relationships with
//! identical attributes are not written at all.
//!
//! [`diff`] is pure. [`validate`] checks that every added target is a live
//! ingredient, reading through the transaction. [`reconcile`] does both.

use larder_concurrency::TransactionContext;
use larder_core::{ContainsIngredient, EdgeMutation, LarderError, LarderResult, INGREDIENT_LABEL};
use std::collections::{BTreeMap, BTreeSet};

/// Changes needed to turn the existing relationship set into the desired one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationPlan {
    /// Targets whose live edge is soft-deleted
    pub removed: BTreeSet<String>,
    /// New relationships, by target
    pub added: BTreeMap<String, ContainsIngredient>,
    /// Kept relationships with new attributes, by target
    pub updated: BTreeMap<String, ContainsIngredient>,
    /// Targets present on both sides, including updated ones
    pub kept: BTreeSet<String>,
}

impl MutationPlan {
    /// True if applying the plan would write nothing
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.updated.is_empty()
    }

    /// Number of edge writes
    pub fn len(&self) -> usize {
        self.removed.len() + self.added.len() + self.updated.len()
    }

    /// Flat list of edge mutations: removals, then updates, then additions
    pub fn mutations(&self) -> Vec<EdgeMutation> {
        let removes = self.removed.iter().map(|target| EdgeMutation::Remove {
            target: target.clone(),
        });
        let updates = self.updated.values().map(|ci| EdgeMutation::Update {
            target: ci.target_id.clone(),
            unit: ci.unit.clone(),
            amount: ci.amount,
        });
        let adds = self.added.values().map(|ci| EdgeMutation::Add {
            target: ci.target_id.clone(),
            unit: ci.unit.clone(),
            amount: ci.amount,
        });
        removes.chain(updates).chain(adds).collect()
    }
}

/// Index relationships by target, rejecting repeats
fn by_target(
    relationships: &[ContainsIngredient],
) -> Result<BTreeMap<&str, &ContainsIngredient>, String> {
    let mut index = BTreeMap::new();
    for ci in relationships {
        if index.insert(ci.target_id.as_str(), ci).is_some() {
            return Err(ci.target_id.clone());
        }
    }
    Ok(index)
}

/// Partition `existing` and `desired` into a plan
///
/// # Errors
///
/// `DuplicateIngredient` if `desired` names a target twice. A store error if
/// `existing` holds two live edges to one target.
pub fn diff(
    existing: &[ContainsIngredient],
    desired: &[ContainsIngredient],
) -> LarderResult<MutationPlan> {
    let desired = by_target(desired).map_err(|id| LarderError::DuplicateIngredient { id })?;
    let existing = by_target(existing)
        .map_err(|id| LarderError::store(format!("multiple live edges to {}", id)))?;

    let mut plan = MutationPlan::default();
    for (target, current) in &existing {
        match desired.get(target) {
            None => {
                plan.removed.insert(target.to_string());
            }
            Some(wanted) => {
                plan.kept.insert(target.to_string());
                if current.unit != wanted.unit || current.amount != wanted.amount {
                    plan.updated.insert(target.to_string(), (*wanted).clone());
                }
            }
        }
    }
    for (target, wanted) in &desired {
        if !existing.contains_key(target) {
            plan.added.insert(target.to_string(), (*wanted).clone());
        }
    }
    Ok(plan)
}

/// Check that every added target is a live ingredient
///
/// # Errors
///
/// `UnknownIngredient` listing every unresolved target, sorted.
pub fn validate(txn: &mut TransactionContext, plan: &MutationPlan) -> LarderResult<()> {
    if plan.added.is_empty() {
        return Ok(());
    }
    let wanted: BTreeSet<String> = plan.added.keys().cloned().collect();
    let resolved = txn.resolve_live(INGREDIENT_LABEL, &wanted)?;
    let missing: Vec<String> = wanted.difference(&resolved).cloned().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LarderError::UnknownIngredient { ids: missing })
    }
}

/// [`diff`] followed by [`validate`]
pub fn reconcile(
    txn: &mut TransactionContext,
    existing: &[ContainsIngredient],
    desired: &[ContainsIngredient],
) -> LarderResult<MutationPlan> {
    let plan = diff(existing, desired)?;
    validate(txn, &plan)?;
    Ok(plan)
}
