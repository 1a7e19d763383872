//! Relationship record
//!
//! A directed, typed edge between two nodes. Relationships are owned by the
//! store's relationship table; their endpoints only reference them.

use super::property::{PropertyBag, PropertyValue};
use super::types::{NodeId, RelationshipId, RelationshipType};
use serde::{Deserialize, Serialize};

/// A directed relationship in the property graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier for this relationship
    pub id: RelationshipId,

    /// Source node (relationship goes FROM this node)
    pub source: NodeId,

    /// Target node (relationship goes TO this node)
    pub target: NodeId,

    /// Type tag (e.g., "KNOWS", "LIKES")
    pub rel_type: RelationshipType,

    /// Properties associated with this relationship
    pub properties: PropertyBag,
}

impl Relationship {
    pub(crate) fn new(
        id: RelationshipId,
        source: NodeId,
        target: NodeId,
        rel_type: RelationshipType,
        properties: PropertyBag,
    ) -> Self {
        Relationship {
            id,
            source,
            target,
            rel_type,
            properties,
        }
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Given one endpoint, return the node at the other end
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }

    pub(crate) fn set_property(&mut self, key: String, value: PropertyValue) -> Option<PropertyValue> {
        self.properties.insert(key, value)
    }

    pub(crate) fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relationship {}

impl std::hash::Hash for Relationship {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
