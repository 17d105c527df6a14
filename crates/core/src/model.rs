//! Domain entities
//!
//! `Food`, `Ingredient` and `Recipe` are graph nodes. `ContainsIngredient` is
//! the attributed edge from a recipe to one of its ingredients; it is owned by
//! the recipe and has no lifecycle of its own.

use crate::resource::Resource;
use crate::value::Properties;
use serde::{Deserialize, Serialize};

/// Label shared by every persisted entity
pub const RESOURCE_LABEL: &str = "Resource";
/// Label of food nodes
pub const FOOD_LABEL: &str = "Food";
/// Label of ingredient nodes
pub const INGREDIENT_LABEL: &str = "Ingredient";
/// Label of recipe nodes
pub const RECIPE_LABEL: &str = "Recipe";
/// Edge type of recipe → ingredient associations
pub const CONTAINS_INGREDIENT: &str = "CONTAINS_INGREDIENT";
/// Label set used to derive ids of recipe → ingredient edges
pub const CONTAINS_INGREDIENT_LABELS: [&str; 2] = ["ContainsIngredient", RESOURCE_LABEL];

/// Edge property holding the unit of measure
pub const UNIT: &str = "unit";
/// Edge property holding the quantity
pub const AMOUNT: &str = "amount";

/// A generic food
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    /// Resource id (assigned on create)
    pub id: String,
    /// Display name
    pub name: String,
    /// Timestamps
    #[serde(flatten)]
    pub resource: Resource,
}

impl Food {
    /// Unpersisted food with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Food {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// An ingredient that recipes can reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Resource id (assigned on create)
    pub id: String,
    /// Display name
    pub name: String,
    /// Timestamps
    #[serde(flatten)]
    pub resource: Resource,
}

impl Ingredient {
    /// Unpersisted ingredient with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A recipe together with its live ingredient associations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Resource id (assigned on create)
    pub id: String,
    /// Title, non-empty
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Ingredient associations, keyed by target ingredient
    pub ingredients: Vec<ContainsIngredient>,
    /// Preparation steps, in order
    pub steps: Vec<String>,
    /// Timestamps
    #[serde(flatten)]
    pub resource: Resource,
}

impl Recipe {
    /// Unpersisted recipe with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Recipe {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder-style description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style steps
    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style ingredient list
    pub fn with_ingredients(mut self, ingredients: Vec<ContainsIngredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Target ids of the ingredient list, in list order
    pub fn ingredient_ids(&self) -> Vec<&str> {
        self.ingredients
            .iter()
            .map(|ci| ci.target_id.as_str())
            .collect()
    }

    /// Association for a given ingredient, if present
    pub fn ingredient(&self, target_id: &str) -> Option<&ContainsIngredient> {
        self.ingredients.iter().find(|ci| ci.target_id == target_id)
    }
}

/// Recipe → Ingredient association with quantity attributes
///
/// Identity within a recipe is the `target_id`; `unit` and `amount` are
/// mutable attributes of the edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainsIngredient {
    /// Edge id; `None` until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unit of measure
    pub unit: String,
    /// Quantity in `unit`
    pub amount: i64,
    /// Referenced ingredient id
    #[serde(rename = "ingredient_id")]
    pub target_id: String,
    /// Timestamps
    #[serde(flatten)]
    pub resource: Resource,
}

impl ContainsIngredient {
    /// Desired association descriptor `{target_id, unit, amount}`
    pub fn new(target_id: impl Into<String>, unit: impl Into<String>, amount: i64) -> Self {
        ContainsIngredient {
            id: None,
            unit: unit.into(),
            amount,
            target_id: target_id.into(),
            resource: Resource::default(),
        }
    }

    /// Equal on `unit`, `amount` and `target_id`, ignoring id and timestamps
    pub fn same_attributes(&self, other: &ContainsIngredient) -> bool {
        self.target_id == other.target_id && self.unit == other.unit && self.amount == other.amount
    }

    /// Edge property map: attributes plus resource timestamps
    ///
    /// The target is the edge's destination, not a property.
    pub fn to_properties(&self) -> Properties {
        let mut props = self.resource.to_properties();
        props.set(UNIT, self.unit.as_str());
        props.set(AMOUNT, self.amount);
        props
    }
}
