//! Generic entity persistence
//!
//! An [`Entity`] maps to one labeled node. [`EntityStore`] provides the five
//! lifecycle operations for any entity type, each in two forms: a standalone
//! call running its own transaction, and an `*_in` call running inside a
//! caller's transaction so several operations commit together.
//!
//! Reads only ever return live nodes. Deletion is soft and cascades to every
//! live edge incident to the node, stamped with the same timestamp.

use crate::database::Database;
use larder_concurrency::TransactionContext;
use larder_core::record::NodeRecord;
use larder_core::{
    generate_id, resource, Food, Ingredient, LarderError, LarderResult, Properties, Recipe,
    Resource, Timestamp, FOOD_LABEL, INGREDIENT_LABEL, RECIPE_LABEL, RESOURCE_LABEL,
};
use std::marker::PhantomData;
use std::sync::Arc;

/// A domain type persisted as a single node
pub trait Entity: Clone + Send + Sync + 'static {
    /// Distinguishing node label
    const LABEL: &'static str;

    /// Full label set written on the node; also the input to id generation
    fn labels() -> [&'static str; 2] {
        [Self::LABEL, RESOURCE_LABEL]
    }

    /// Resource id
    fn id(&self) -> &str;

    /// Replace the resource id
    fn set_id(&mut self, id: String);

    /// Timestamps
    fn resource(&self) -> &Resource;

    /// Mutable timestamps
    fn resource_mut(&mut self) -> &mut Resource;

    /// Mutable scalar fields as node properties
    fn scalar_properties(&self) -> Properties;

    /// Rebuild from a stored node
    fn from_node(node: &NodeRecord) -> LarderResult<Self>;

    /// All node properties: scalars plus timestamps
    fn to_properties(&self) -> Properties {
        let mut props = self.resource().to_properties();
        props.merge(self.scalar_properties());
        props
    }
}

const NAME: &str = "name";
const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const STEPS: &str = "steps";

impl Entity for Food {
    const LABEL: &'static str = FOOD_LABEL;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn scalar_properties(&self) -> Properties {
        Properties::new().with(NAME, self.name.as_str())
    }

    fn from_node(node: &NodeRecord) -> LarderResult<Self> {
        Ok(Food {
            id: node.id.clone(),
            name: node.properties.string(&node.id, NAME)?,
            resource: Resource::from_properties(&node.id, &node.properties)?,
        })
    }
}

impl Entity for Ingredient {
    const LABEL: &'static str = INGREDIENT_LABEL;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn scalar_properties(&self) -> Properties {
        Properties::new().with(NAME, self.name.as_str())
    }

    fn from_node(node: &NodeRecord) -> LarderResult<Self> {
        Ok(Ingredient {
            id: node.id.clone(),
            name: node.properties.string(&node.id, NAME)?,
            resource: Resource::from_properties(&node.id, &node.properties)?,
        })
    }
}

/// Scalar fields only; the ingredient list lives on edges.
impl Entity for Recipe {
    const LABEL: &'static str = RECIPE_LABEL;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn scalar_properties(&self) -> Properties {
        Properties::new()
            .with(TITLE, self.title.as_str())
            .with_opt(DESCRIPTION, self.description.clone())
            .with(STEPS, self.steps.clone())
    }

    fn from_node(node: &NodeRecord) -> LarderResult<Self> {
        Ok(Recipe {
            id: node.id.clone(),
            title: node.properties.string(&node.id, TITLE)?,
            description: node.properties.opt_string(&node.id, DESCRIPTION)?,
            ingredients: Vec::new(),
            steps: node.properties.string_list(&node.id, STEPS)?,
            resource: Resource::from_properties(&node.id, &node.properties)?,
        })
    }
}

/// Lifecycle operations for one entity type
pub struct EntityStore<E: Entity> {
    db: Arc<Database>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        EntityStore {
            db: Arc::clone(&self.db),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityStore<E> {
    /// Create a store over `db`
    pub fn new(db: Arc<Database>) -> Self {
        EntityStore {
            db,
            _entity: PhantomData,
        }
    }

    // ========================================================================
    // Standalone operations
    // ========================================================================

    /// Every live entity, ordered by id
    pub fn get_all(&self) -> LarderResult<Vec<E>> {
        self.db.transaction(|txn| self.get_all_in(txn))
    }

    /// A live entity by id
    pub fn get_by_id(&self, id: &str) -> LarderResult<Option<E>> {
        self.db.transaction(|txn| self.get_by_id_in(txn, id))
    }

    /// Persist a new entity, assigning id and `created`
    pub fn create(&self, entity: E) -> LarderResult<E> {
        self.db.transaction(|txn| self.create_in(txn, entity))
    }

    /// Overwrite the scalar fields of a live entity
    pub fn update(&self, entity: E) -> LarderResult<E> {
        self.db.transaction(|txn| self.update_in(txn, entity))
    }

    /// Soft-delete an entity and its incident relationships
    pub fn delete(&self, id: &str) -> LarderResult<String> {
        self.db.transaction(|txn| self.delete_in(txn, id))
    }

    // ========================================================================
    // In-transaction operations
    // ========================================================================

    /// [`Self::get_all`] inside `txn`
    pub fn get_all_in(&self, txn: &mut TransactionContext) -> LarderResult<Vec<E>> {
        txn.live_nodes(E::LABEL)?
            .iter()
            .map(E::from_node)
            .collect()
    }

    /// [`Self::get_by_id`] inside `txn`
    pub fn get_by_id_in(&self, txn: &mut TransactionContext, id: &str) -> LarderResult<Option<E>> {
        txn.live_node(E::LABEL, id)?
            .as_ref()
            .map(E::from_node)
            .transpose()
    }

    /// [`Self::create`] inside `txn`
    pub fn create_in(&self, txn: &mut TransactionContext, entity: E) -> LarderResult<E> {
        self.create_at(txn, entity, Timestamp::now())
    }

    /// [`Self::update`] inside `txn`
    pub fn update_in(&self, txn: &mut TransactionContext, entity: E) -> LarderResult<E> {
        self.update_at(txn, entity, Timestamp::now())
    }

    /// [`Self::delete`] inside `txn`
    pub fn delete_in(&self, txn: &mut TransactionContext, id: &str) -> LarderResult<String> {
        self.delete_at(txn, id, Timestamp::now())
    }

    pub(crate) fn create_at(
        &self,
        txn: &mut TransactionContext,
        mut entity: E,
        now: Timestamp,
    ) -> LarderResult<E> {
        let labels = E::labels();
        entity.set_id(generate_id(&labels)?);
        *entity.resource_mut() = Resource::created_at(now);
        txn.put_node(NodeRecord::new(entity.id(), &labels, entity.to_properties()))?;

        tracing::debug!(target: "larder::entity", label = E::LABEL, id = %entity.id(), "created");
        Ok(entity)
    }

    pub(crate) fn update_at(
        &self,
        txn: &mut TransactionContext,
        mut entity: E,
        now: Timestamp,
    ) -> LarderResult<E> {
        let existing = txn
            .live_node(E::LABEL, entity.id())?
            .ok_or_else(|| LarderError::not_found(E::LABEL, entity.id()))?;
        let mut stamps = Resource::from_properties(&existing.id, &existing.properties)?;
        stamps.touch(now);
        *entity.resource_mut() = stamps;

        let labels: Vec<&str> = existing.labels.iter().map(String::as_str).collect();
        txn.put_node(NodeRecord::new(entity.id(), &labels, entity.to_properties()))?;

        tracing::debug!(target: "larder::entity", label = E::LABEL, id = %entity.id(), "updated");
        Ok(entity)
    }

    pub(crate) fn delete_at(
        &self,
        txn: &mut TransactionContext,
        id: &str,
        now: Timestamp,
    ) -> LarderResult<String> {
        let mut node = txn
            .get_node(id)?
            .filter(|n| n.has_label(E::LABEL))
            .ok_or_else(|| LarderError::not_found(E::LABEL, id))?;

        if !resource::soft_delete_properties(&mut node.properties, now) {
            tracing::debug!(target: "larder::entity", label = E::LABEL, id = %id, "already deleted");
            return Ok(id.to_string());
        }

        let edges = txn.live_edges_of(id)?;
        let cascaded = edges.len();
        for mut edge in edges {
            resource::soft_delete_properties(&mut edge.properties, now);
            txn.put_edge(edge)?;
        }
        txn.put_node(node)?;

        tracing::debug!(
            target: "larder::entity",
            label = E::LABEL,
            id = %id,
            cascaded,
            "deleted"
        );
        Ok(id.to_string())
    }
}

impl<E: Entity> std::fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore").field("label", &E::LABEL).finish()
    }
}
