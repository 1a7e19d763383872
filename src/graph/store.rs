//! In-memory graph storage implementation
//!
//! The store owns every node and relationship, enforces identity and
//! referential integrity, and drives the property indexes: each mutation
//! describes its effect as an [`IndexEvent`], validates it against the
//! indexes, changes the node, and applies the event, all within one call.

use super::event::IndexEvent;
use super::node::Node;
use super::property::{PropertyBag, PropertyValue, ValueType};
use super::relationship::Relationship;
use super::types::{Direction, EntityId, Label, NodeId, RelationshipId, RelationshipType};
use crate::index::manager::type_error;
use crate::index::{IndexManager, PropertyIndex, PropertyIndexKey};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Relationship {0} not found")]
    RelationshipNotFound(RelationshipId),

    #[error("Node {node} still has {count} relationship(s)")]
    NodeHasRelationships { node: NodeId, count: usize },

    #[error("Relationship {rel_type} from {from} to {to} already exists")]
    DuplicateRelationship {
        from: NodeId,
        to: NodeId,
        rel_type: RelationshipType,
    },

    #[error("Lookup :{label}({key} = {value}) matched {count} nodes, expected at most one")]
    AmbiguousLookup {
        label: Label,
        key: String,
        value: PropertyValue,
        count: usize,
    },

    #[error("Property '{key}' is indexed as {expected}, got {found}")]
    InvalidPropertyType {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),
}

/// Coarse failure category of a [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidPropertyType,
    TransactionAborted,
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::NodeNotFound(_) | GraphError::RelationshipNotFound(_) => ErrorKind::NotFound,
            GraphError::NodeHasRelationships { .. }
            | GraphError::DuplicateRelationship { .. }
            | GraphError::AmbiguousLookup { .. } => ErrorKind::Conflict,
            GraphError::InvalidPropertyType { .. } => ErrorKind::InvalidPropertyType,
            GraphError::TransactionAborted(_) => ErrorKind::TransactionAborted,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Store-wide behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Reject a second relationship with the same (source, target, type)
    pub unique_relationships: bool,
}

/// In-memory graph storage
///
/// - nodes: arena indexed by NodeId, `None` once deleted (ids are never reused)
/// - relationships: arena indexed by RelationshipId
/// - label_index: Label -> NodeIds, for label scans
/// - indexes: declared (label, property) indexes
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Option<Node>>,
    relationships: Vec<Option<Relationship>>,
    label_index: HashMap<Label, BTreeSet<NodeId>>,
    indexes: IndexManager,
    options: StoreOptions,
    node_count: usize,
    relationship_count: usize,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        GraphStore {
            // slot 0 is never handed out, ids start at 1
            nodes: vec![None],
            relationships: vec![None],
            label_index: HashMap::new(),
            indexes: IndexManager::new(),
            options,
            node_count: 0,
            relationship_count: 0,
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    // ============================================================
    // Nodes
    // ============================================================

    /// Create a node with a single label and no properties
    pub fn create_node(&mut self, label: impl Into<Label>) -> NodeId {
        let node_id = NodeId::new(self.nodes.len() as u64);
        let label = label.into();
        self.label_index.entry(label.clone()).or_default().insert(node_id);
        self.nodes.push(Some(Node::new(node_id, [label])));
        self.node_count += 1;
        node_id
    }

    /// Create a node with labels and properties.
    ///
    /// Fails with `InvalidPropertyType`, allocating nothing, if a property
    /// conflicts with the value type of an index covering one of the labels.
    pub fn create_node_with_properties(
        &mut self,
        labels: Vec<Label>,
        properties: PropertyBag,
    ) -> GraphResult<NodeId> {
        let node_id = NodeId::new(self.nodes.len() as u64);
        let event = IndexEvent::NodeCreated {
            id: node_id,
            labels: labels.clone(),
            properties: properties.clone(),
        };
        self.indexes.validate(&event)?;

        let mut node = Node::new(node_id, labels);
        node.properties = properties;
        for label in &node.labels {
            self.label_index.entry(label.clone()).or_default().insert(node_id);
        }
        self.nodes.push(Some(node));
        self.node_count += 1;
        self.indexes.apply(event);
        Ok(node_id)
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.as_u64() as usize).and_then(Option::as_ref)
    }

    /// Get a node by ID, failing with `NotFound`
    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.get_node(id).ok_or(GraphError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(id.as_u64() as usize)
            .and_then(Option::as_mut)
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Set a property on a node, moving its index entries from the old value to the new one
    pub fn set_node_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        let key = key.into();
        let value = value.into();
        let node = self.node(node_id)?;

        let event = IndexEvent::PropertySet {
            id: node_id,
            labels: node.labels.iter().cloned().collect(),
            key: key.clone(),
            old_value: node.get_property(&key).cloned(),
            new_value: value.clone(),
        };
        self.indexes.validate(&event)?;

        let old = self.node_mut(node_id)?.set_property(key, value);
        self.indexes.apply(event);
        Ok(old)
    }

    /// Remove a property from a node together with its index entries
    pub fn remove_node_property(&mut self, node_id: NodeId, key: &str) -> GraphResult<Option<PropertyValue>> {
        let node = self.node_mut(node_id)?;
        let Some(old_value) = node.remove_property(key) else {
            return Ok(None);
        };
        let labels = node.labels.iter().cloned().collect();

        self.indexes.apply(IndexEvent::PropertyRemoved {
            id: node_id,
            labels,
            key: key.to_string(),
            old_value: old_value.clone(),
        });
        Ok(Some(old_value))
    }

    /// Add a label to an existing node AND backfill the indexes declared for it
    pub fn add_label(&mut self, node_id: NodeId, label: impl Into<Label>) -> GraphResult<bool> {
        let label = label.into();
        let node = self.node(node_id)?;
        if node.has_label(&label) {
            return Ok(false);
        }

        let event = IndexEvent::LabelAdded {
            id: node_id,
            label: label.clone(),
            properties: node.properties.clone(),
        };
        self.indexes.validate(&event)?;

        self.node_mut(node_id)?.add_label(label.clone());
        self.label_index.entry(label).or_default().insert(node_id);
        self.indexes.apply(event);
        Ok(true)
    }

    /// Delete a node. Its relationships must have been deleted first.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let node = self.node(id)?;
        if node.degree() > 0 {
            return Err(GraphError::NodeHasRelationships {
                node: id,
                count: node.degree(),
            });
        }

        let node = self.nodes[id.as_u64() as usize]
            .take()
            .ok_or(GraphError::NodeNotFound(id))?;
        self.node_count -= 1;

        for label in &node.labels {
            if let Some(node_set) = self.label_index.get_mut(label) {
                node_set.remove(&id);
            }
        }
        self.indexes.apply(IndexEvent::NodeDeleted {
            id,
            labels: node.labels.iter().cloned().collect(),
            properties: node.properties.clone(),
        });

        debug!("Deleted node {}", id);
        Ok(node)
    }

    // ============================================================
    // Relationships
    // ============================================================

    /// Create a relationship between two nodes
    pub fn create_relationship(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: impl Into<RelationshipType>,
    ) -> GraphResult<RelationshipId> {
        self.create_relationship_with_properties(source, target, rel_type, PropertyBag::new())
    }

    /// Create a relationship with properties
    pub fn create_relationship_with_properties(
        &mut self,
        source: NodeId,
        target: NodeId,
        rel_type: impl Into<RelationshipType>,
        properties: PropertyBag,
    ) -> GraphResult<RelationshipId> {
        self.node(source)?;
        self.node(target)?;
        let rel_type = rel_type.into();

        if self.options.unique_relationships && self.find_relationship(source, target, &rel_type).is_some() {
            return Err(GraphError::DuplicateRelationship {
                from: source,
                to: target,
                rel_type,
            });
        }

        let rel_id = RelationshipId::new(self.relationships.len() as u64);
        self.node_mut(source)?.outgoing.insert(rel_id);
        self.node_mut(target)?.incoming.insert(rel_id);
        self.relationships
            .push(Some(Relationship::new(rel_id, source, target, rel_type, properties)));
        self.relationship_count += 1;
        Ok(rel_id)
    }

    /// Get a relationship by ID
    pub fn get_relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(id.as_u64() as usize).and_then(Option::as_ref)
    }

    /// Get a relationship by ID, failing with `NotFound`
    pub fn relationship(&self, id: RelationshipId) -> GraphResult<&Relationship> {
        self.get_relationship(id).ok_or(GraphError::RelationshipNotFound(id))
    }

    fn relationship_mut(&mut self, id: RelationshipId) -> GraphResult<&mut Relationship> {
        self.relationships
            .get_mut(id.as_u64() as usize)
            .and_then(Option::as_mut)
            .ok_or(GraphError::RelationshipNotFound(id))
    }

    /// Check if a relationship exists
    pub fn has_relationship(&self, id: RelationshipId) -> bool {
        self.get_relationship(id).is_some()
    }

    /// First relationship of `rel_type` from `source` to `target`, if any
    pub fn find_relationship(
        &self,
        source: NodeId,
        target: NodeId,
        rel_type: &RelationshipType,
    ) -> Option<RelationshipId> {
        self.get_node(source)?
            .outgoing()
            .filter_map(|id| self.get_relationship(id))
            .find(|rel| rel.target == target && &rel.rel_type == rel_type)
            .map(|rel| rel.id)
    }

    pub fn set_relationship_property(
        &mut self,
        rel_id: RelationshipId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        Ok(self.relationship_mut(rel_id)?.set_property(key.into(), value.into()))
    }

    pub fn remove_relationship_property(
        &mut self,
        rel_id: RelationshipId,
        key: &str,
    ) -> GraphResult<Option<PropertyValue>> {
        Ok(self.relationship_mut(rel_id)?.remove_property(key))
    }

    /// Delete a relationship, detaching it from both endpoints
    pub fn delete_relationship(&mut self, id: RelationshipId) -> GraphResult<Relationship> {
        let rel = self
            .relationships
            .get_mut(id.as_u64() as usize)
            .and_then(Option::take)
            .ok_or(GraphError::RelationshipNotFound(id))?;
        self.relationship_count -= 1;

        if let Ok(source) = self.node_mut(rel.source) {
            source.outgoing.shift_remove(&id);
        }
        if let Ok(target) = self.node_mut(rel.target) {
            target.incoming.shift_remove(&id);
        }
        Ok(rel)
    }

    /// Relationships of a node in creation order, filtered by direction and
    /// optionally by type. A self-loop is reported once even for `Both`.
    pub fn relationships_of(
        &self,
        node_id: NodeId,
        direction: Direction,
        rel_type: Option<&RelationshipType>,
    ) -> GraphResult<Vec<&Relationship>> {
        let node = self.node(node_id)?;
        let mut ids: Vec<RelationshipId> = Vec::with_capacity(node.degree());
        if direction.includes_outgoing() {
            ids.extend(node.outgoing());
        }
        if direction.includes_incoming() {
            ids.extend(node.incoming());
        }
        if direction == Direction::Both {
            // ids are allocated in creation order
            ids.sort_unstable();
            ids.dedup();
        }

        Ok(ids
            .into_iter()
            .filter_map(|id| self.get_relationship(id))
            .filter(|rel| rel_type.map_or(true, |t| &rel.rel_type == t))
            .collect())
    }

    /// Nodes at the other end of `relationships_of`, in the same order
    pub fn neighbors(
        &self,
        node_id: NodeId,
        direction: Direction,
        rel_type: Option<&RelationshipType>,
    ) -> GraphResult<Vec<NodeId>> {
        Ok(self
            .relationships_of(node_id, direction, rel_type)?
            .into_iter()
            .filter_map(|rel| rel.other_node(node_id))
            .collect())
    }

    // ============================================================
    // Properties on either entity
    // ============================================================

    pub fn set_property(
        &mut self,
        entity: impl Into<EntityId>,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<Option<PropertyValue>> {
        match entity.into() {
            EntityId::Node(id) => self.set_node_property(id, key, value),
            EntityId::Relationship(id) => self.set_relationship_property(id, key, value),
        }
    }

    pub fn remove_property(&mut self, entity: impl Into<EntityId>, key: &str) -> GraphResult<Option<PropertyValue>> {
        match entity.into() {
            EntityId::Node(id) => self.remove_node_property(id, key),
            EntityId::Relationship(id) => self.remove_relationship_property(id, key),
        }
    }

    pub fn get_property(&self, entity: impl Into<EntityId>, key: &str) -> GraphResult<Option<&PropertyValue>> {
        match entity.into() {
            EntityId::Node(id) => Ok(self.node(id)?.get_property(key)),
            EntityId::Relationship(id) => Ok(self.relationship(id)?.get_property(key)),
        }
    }

    // ============================================================
    // Indexes
    // ============================================================

    /// Declare an index on (label, property), backfilling it from existing
    /// nodes. Fails with `InvalidPropertyType` if those nodes disagree on the
    /// property's type; the store is unchanged in that case.
    pub fn create_index(&mut self, label: impl Into<Label>, property: impl Into<String>) -> GraphResult<()> {
        let key = PropertyIndexKey::new(label, property);
        if self.indexes.has_index(&key.label, &key.property) {
            return Ok(());
        }

        let entries = self
            .label_index
            .get(&key.label)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get_node(id))
            .filter_map(|node| node.get_property(&key.property).map(|v| (v.clone(), node.id)));
        let index = PropertyIndex::build(entries).map_err(|m| type_error(&key.property, m))?;

        self.indexes.install(key, index);
        Ok(())
    }

    pub fn drop_index(&mut self, label: &Label, property: &str) -> bool {
        self.indexes.drop_index(label, property)
    }

    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    /// Exact-match index lookup; empty when nothing matches
    pub fn lookup(&self, label: &Label, property: &str, value: &PropertyValue) -> BTreeSet<NodeId> {
        self.indexes.lookup(label, property, value)
    }

    /// The single node matching an index lookup, `Conflict` if there are several
    pub fn lookup_single(&self, label: &Label, property: &str, value: &PropertyValue) -> GraphResult<Option<NodeId>> {
        let matches = self.lookup(label, property, value);
        if matches.len() > 1 {
            return Err(GraphError::AmbiguousLookup {
                label: label.clone(),
                key: property.to_string(),
                value: value.clone(),
                count: matches.len(),
            });
        }
        Ok(matches.into_iter().next())
    }

    // ============================================================
    // Scans and statistics
    // ============================================================

    /// Get all nodes with a specific label, in id order
    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|node_ids| node_ids.iter().filter_map(|&id| self.get_node(id)).collect())
            .unwrap_or_default()
    }

    /// All live nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    /// All live relationships in id order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().flatten()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Get total number of relationships
    pub fn relationship_count(&self) -> usize {
        self.relationship_count
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(store: &mut GraphStore, id: i64, name: &str) -> NodeId {
        let mut props = PropertyBag::new();
        props.insert("id".to_string(), id.into());
        props.insert("name".to_string(), name.into());
        store
            .create_node_with_properties(vec![Label::new("User")], props)
            .unwrap()
    }

    #[test]
    fn test_create_and_get_node() {
        let mut store = GraphStore::new();
        let node_id = store.create_node("User");

        assert_eq!(store.node_count(), 1);
        assert_eq!(node_id, NodeId::new(1));
        let node = store.get_node(node_id).unwrap();
        assert_eq!(node.id, node_id);
        assert!(node.has_label(&Label::new("User")));
        assert!(node.properties.is_empty());
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut store = GraphStore::new();
        let a = store.create_node("User");
        store.delete_node(a).unwrap();
        let b = store.create_node("User");
        assert!(b > a);

        let c = store.create_node("User");
        let r1 = store.create_relationship(b, c, "KNOWS").unwrap();
        store.delete_relationship(r1).unwrap();
        let r2 = store.create_relationship(b, c, "KNOWS").unwrap();
        assert!(r2 > r1);
    }

    #[test]
    fn test_create_and_get_relationship() {
        let mut store = GraphStore::new();
        let node1 = store.create_node("User");
        let node2 = store.create_node("User");

        let rel_id = store.create_relationship(node1, node2, "KNOWS").unwrap();

        assert_eq!(store.relationship_count(), 1);
        let rel = store.get_relationship(rel_id).unwrap();
        assert_eq!(rel.source, node1);
        assert_eq!(rel.target, node2);
        assert_eq!(rel.rel_type, RelationshipType::new("KNOWS"));
        assert!(store.get_node(node1).unwrap().outgoing().any(|r| r == rel_id));
        assert!(store.get_node(node2).unwrap().incoming().any(|r| r == rel_id));
    }

    #[test]
    fn test_relationship_validation() {
        let mut store = GraphStore::new();
        let node1 = store.create_node("User");
        let missing = NodeId::new(999);

        let result = store.create_relationship(missing, node1, "KNOWS");
        assert_eq!(result, Err(GraphError::NodeNotFound(missing)));

        let result = store.create_relationship(node1, missing, "KNOWS");
        assert_eq!(result, Err(GraphError::NodeNotFound(missing)));
        assert_eq!(store.relationship_count(), 0);
        assert_eq!(store.get_node(node1).unwrap().degree(), 0);
    }

    #[test]
    fn test_relationships_of_direction_and_type() {
        let mut store = GraphStore::new();
        let me = store.create_node("User");
        let friend = store.create_node("User");
        let site = store.create_node("Website");

        let knows = store.create_relationship(me, friend, "KNOWS").unwrap();
        let likes = store.create_relationship(me, site, "LIKES").unwrap();
        let back = store.create_relationship(friend, me, "KNOWS").unwrap();

        let out: Vec<_> = store
            .relationships_of(me, Direction::Outgoing, None)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(out, vec![knows, likes]);

        let knows_type = RelationshipType::new("KNOWS");
        let both: Vec<_> = store
            .relationships_of(me, Direction::Both, Some(&knows_type))
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(both, vec![knows, back]);

        let incoming = store.neighbors(me, Direction::Incoming, None).unwrap();
        assert_eq!(incoming, vec![friend]);

        assert_eq!(
            store.relationships_of(NodeId::new(42), Direction::Both, None).unwrap_err(),
            GraphError::NodeNotFound(NodeId::new(42))
        );
    }

    #[test]
    fn test_self_loop_reported_once() {
        let mut store = GraphStore::new();
        let n = store.create_node("User");
        let rel = store.create_relationship(n, n, "KNOWS").unwrap();

        let both = store.relationships_of(n, Direction::Both, None).unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, rel);
        assert_eq!(store.get_node(n).unwrap().degree(), 2);
    }

    #[test]
    fn test_delete_node_with_relationships_conflicts() {
        let mut store = GraphStore::new();
        let a = store.create_node("User");
        let b = store.create_node("User");
        let rel = store.create_relationship(a, b, "KNOWS").unwrap();

        let err = store.delete_node(b).unwrap_err();
        assert_eq!(err, GraphError::NodeHasRelationships { node: b, count: 1 });
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(store.has_node(b));

        store.delete_relationship(rel).unwrap();
        store.delete_node(b).unwrap();
        assert!(!store.has_node(b));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_delete_relationship_twice() {
        let mut store = GraphStore::new();
        let a = store.create_node("User");
        let b = store.create_node("User");
        let rel = store.create_relationship(a, b, "KNOWS").unwrap();

        let deleted = store.delete_relationship(rel).unwrap();
        assert_eq!(deleted.id, rel);
        assert_eq!(store.get_node(a).unwrap().degree(), 0);
        assert_eq!(store.get_node(b).unwrap().degree(), 0);

        let err = store.delete_relationship(rel).unwrap_err();
        assert_eq!(err, GraphError::RelationshipNotFound(rel));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_unique_relationships_option() {
        let mut store = GraphStore::with_options(StoreOptions { unique_relationships: true });
        let a = store.create_node("User");
        let b = store.create_node("User");

        store.create_relationship(a, b, "KNOWS").unwrap();
        let err = store.create_relationship(a, b, "KNOWS").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        store.create_relationship(a, b, "LIKES").unwrap();
        store.create_relationship(b, a, "KNOWS").unwrap();

        let mut relaxed = GraphStore::new();
        let a = relaxed.create_node("User");
        let b = relaxed.create_node("User");
        relaxed.create_relationship(a, b, "KNOWS").unwrap();
        relaxed.create_relationship(a, b, "KNOWS").unwrap();
        assert_eq!(relaxed.relationship_count(), 2);
    }

    #[test]
    fn test_set_property_updates_index() {
        let mut store = GraphStore::new();
        store.create_index("User", "email").unwrap();
        let me = user(&mut store, 1, "me");
        let users = Label::new("User");

        store.set_property(me, "email", "me@net.org").unwrap();
        assert!(store.lookup(&users, "email", &"me@net.org".into()).contains(&me));

        let old = store.set_property(me, "email", "x@y.z").unwrap();
        assert_eq!(old, Some(PropertyValue::from("me@net.org")));
        assert!(store.lookup(&users, "email", &"me@net.org".into()).is_empty());
        assert!(store.lookup(&users, "email", &"x@y.z".into()).contains(&me));

        store.remove_property(me, "email").unwrap();
        assert!(store.lookup(&users, "email", &"x@y.z".into()).is_empty());
    }

    #[test]
    fn test_invalid_property_type_leaves_node_untouched() {
        let mut store = GraphStore::new();
        store.create_index("User", "id").unwrap();
        let u = user(&mut store, 7, "user7");

        let err = store.set_property(u, "id", "seven").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPropertyType);
        assert_eq!(store.get_property(u, "id").unwrap(), Some(&PropertyValue::Integer(7)));

        let mut props = PropertyBag::new();
        props.insert("id".to_string(), "eight".into());
        let before = store.node_count();
        assert!(store
            .create_node_with_properties(vec![Label::new("User")], props)
            .is_err());
        assert_eq!(store.node_count(), before);
    }

    #[test]
    fn test_same_key_on_other_label_is_independent() {
        let mut store = GraphStore::new();
        store.create_index("User", "id").unwrap();
        store.create_index("Website", "id").unwrap();
        let u = user(&mut store, 9, "user9");
        let w = store.create_node("Website");
        store.set_property(w, "id", 9i64).unwrap();

        assert_eq!(store.lookup(&Label::new("User"), "id", &9i64.into()).len(), 1);
        assert!(store.lookup(&Label::new("User"), "id", &9i64.into()).contains(&u));
        assert!(store.lookup(&Label::new("Website"), "id", &9i64.into()).contains(&w));
    }

    #[test]
    fn test_create_index_backfills() {
        let mut store = GraphStore::new();
        let a = user(&mut store, 1, "me");
        let b = user(&mut store, 2, "user2");

        store.create_index("User", "name").unwrap();
        let users = Label::new("User");
        assert_eq!(store.lookup_single(&users, "name", &"me".into()).unwrap(), Some(a));
        assert_eq!(store.lookup_single(&users, "name", &"user2".into()).unwrap(), Some(b));
        assert_eq!(store.lookup_single(&users, "name", &"nobody".into()).unwrap(), None);
    }

    #[test]
    fn test_create_index_rejects_mixed_types() {
        let mut store = GraphStore::new();
        let a = store.create_node("User");
        let b = store.create_node("User");
        store.set_property(a, "code", 1i64).unwrap();
        store.set_property(b, "code", "one").unwrap();

        let err = store.create_index("User", "code").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPropertyType);
        assert!(!store.indexes().has_index(&Label::new("User"), "code"));
    }

    #[test]
    fn test_lookup_single_ambiguous() {
        let mut store = GraphStore::new();
        store.create_index("User", "name").unwrap();
        user(&mut store, 1, "dup");
        user(&mut store, 2, "dup");

        let err = store
            .lookup_single(&Label::new("User"), "name", &"dup".into())
            .unwrap_err();
        assert!(matches!(err, GraphError::AmbiguousLookup { count: 2, .. }));
    }

    #[test]
    fn test_add_label_backfills_index() {
        let mut store = GraphStore::new();
        store.create_index("Admin", "name").unwrap();
        let u = user(&mut store, 1, "me");
        let admins = Label::new("Admin");
        assert!(store.lookup(&admins, "name", &"me".into()).is_empty());

        assert!(store.add_label(u, "Admin").unwrap());
        assert!(!store.add_label(u, "Admin").unwrap());
        assert!(store.lookup(&admins, "name", &"me".into()).contains(&u));
        assert_eq!(store.get_nodes_by_label(&admins).len(), 1);
    }

    #[test]
    fn test_delete_node_removes_index_entries() {
        let mut store = GraphStore::new();
        store.create_index("User", "name").unwrap();
        let u = user(&mut store, 5, "user5");

        store.delete_node(u).unwrap();
        assert!(store.lookup(&Label::new("User"), "name", &"user5".into()).is_empty());
        assert!(store.get_nodes_by_label(&Label::new("User")).is_empty());
        assert_eq!(store.get_property(u, "name").unwrap_err(), GraphError::NodeNotFound(u));
    }

    #[test]
    fn test_relationship_properties() {
        let mut store = GraphStore::new();
        let a = store.create_node("User");
        let b = store.create_node("Website");
        let rel = store.create_relationship(a, b, "LIKES").unwrap();

        store.set_property(rel, "stars", 5i64).unwrap();
        assert_eq!(store.get_property(rel, "stars").unwrap(), Some(&PropertyValue::Integer(5)));
        assert_eq!(store.remove_property(rel, "stars").unwrap(), Some(PropertyValue::Integer(5)));

        let missing = RelationshipId::new(77);
        assert_eq!(
            store.set_property(missing, "stars", 1i64).unwrap_err(),
            GraphError::RelationshipNotFound(missing)
        );
    }
}
