//! Node record
//!
//! A node owns its property bag and holds back-references to the
//! relationships that start or end at it. The relationship records
//! themselves live in the store's relationship table.

use super::property::{PropertyBag, PropertyValue};
use super::types::{Label, NodeId, RelationshipId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node in the property graph
///
/// Mutation goes through [`GraphStore`](super::GraphStore) so that property
/// indexes stay in step; the setters here are crate-private.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Entity kinds this node belongs to
    pub labels: BTreeSet<Label>,

    /// Properties associated with this node
    pub properties: PropertyBag,

    /// Outgoing relationships in creation order
    pub(crate) outgoing: IndexSet<RelationshipId>,

    /// Incoming relationships in creation order
    pub(crate) incoming: IndexSet<RelationshipId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, labels: impl IntoIterator<Item = Label>) -> Self {
        Node {
            id,
            labels: labels.into_iter().collect(),
            properties: PropertyBag::new(),
            outgoing: IndexSet::new(),
            incoming: IndexSet::new(),
        }
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn outgoing(&self) -> impl Iterator<Item = RelationshipId> + '_ {
        self.outgoing.iter().copied()
    }

    pub fn incoming(&self) -> impl Iterator<Item = RelationshipId> + '_ {
        self.incoming.iter().copied()
    }

    /// Total number of relationships touching this node. A self-loop counts twice.
    pub fn degree(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }

    pub(crate) fn set_property(&mut self, key: String, value: PropertyValue) -> Option<PropertyValue> {
        self.properties.insert(key, value)
    }

    pub(crate) fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    pub(crate) fn add_label(&mut self, label: Label) -> bool {
        self.labels.insert(label)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
