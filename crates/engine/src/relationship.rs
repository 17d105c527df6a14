//! Recipe → Ingredient relationships
//!
//! Edges of type `CONTAINS_INGREDIENT` from a recipe node to an ingredient
//! node, carrying `unit` and `amount`. A recipe has at most one live edge
//! per ingredient.

use larder_concurrency::TransactionContext;
use larder_core::record::EdgeRecord;
use larder_core::{
    ContainsIngredient, LarderError, LarderResult, Resource, AMOUNT, CONTAINS_INGREDIENT,
    INGREDIENT_LABEL, UNIT,
};

/// Rebuild a [`ContainsIngredient`] from a stored edge
///
/// # Errors
///
/// A store error if the edge has the wrong type or is missing `unit` or
/// `amount`.
pub fn parse_relationship(edge: &EdgeRecord) -> LarderResult<ContainsIngredient> {
    if edge.edge_type != CONTAINS_INGREDIENT {
        return Err(LarderError::corrupt_record(
            &edge.id,
            format!("expected {} edge, found {}", CONTAINS_INGREDIENT, edge.edge_type),
        ));
    }
    Ok(ContainsIngredient {
        id: Some(edge.id.clone()),
        unit: edge.properties.string(&edge.id, UNIT)?,
        amount: edge.properties.int(&edge.id, AMOUNT)?,
        target_id: edge.dst.clone(),
        resource: Resource::from_properties(&edge.id, &edge.properties)?,
    })
}

/// Live relationships of `recipe_id` whose target ingredient is also live,
/// ordered by target id
pub fn live_relationships(
    txn: &mut TransactionContext,
    recipe_id: &str,
) -> LarderResult<Vec<ContainsIngredient>> {
    let mut relationships = Vec::new();
    for edge in txn.live_out_edges(recipe_id, CONTAINS_INGREDIENT)? {
        if txn.live_node(INGREDIENT_LABEL, &edge.dst)?.is_none() {
            continue;
        }
        relationships.push(parse_relationship(&edge)?);
    }
    relationships.sort_by(|a, b| a.target_id.cmp(&b.target_id));
    Ok(relationships)
}
