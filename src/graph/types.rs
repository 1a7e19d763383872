//! Core type definitions for the graph store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Unique identifier for a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RelationshipId(pub u64);

impl RelationshipId {
    pub fn new(id: u64) -> Self {
        RelationshipId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelationshipId({})", self.0)
    }
}

impl From<u64> for RelationshipId {
    fn from(id: u64) -> Self {
        RelationshipId(id)
    }
}

/// Either kind of entity that can carry a property bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Node(NodeId),
    Relationship(RelationshipId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Node(id) => id.fmt(f),
            EntityId::Relationship(id) => id.fmt(f),
        }
    }
}

impl From<NodeId> for EntityId {
    fn from(id: NodeId) -> Self {
        EntityId::Node(id)
    }
}

impl From<RelationshipId> for EntityId {
    fn from(id: RelationshipId) -> Self {
        EntityId::Relationship(id)
    }
}

/// Node label, the entity kind that property indexes are declared over
/// (e.g., "User", "Website")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<&Label> for Label {
    fn from(l: &Label) -> Self {
        l.clone()
    }
}

/// Relationship type tag (e.g., "KNOWS", "LIKES")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RelationshipType(String);

impl RelationshipType {
    pub fn new(rel_type: impl Into<String>) -> Self {
        RelationshipType(rel_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RelationshipType {
    fn from(s: String) -> Self {
        RelationshipType(s)
    }
}

impl From<&str> for RelationshipType {
    fn from(s: &str) -> Self {
        RelationshipType(s.to_string())
    }
}

impl From<&RelationshipType> for RelationshipType {
    fn from(t: &RelationshipType) -> Self {
        t.clone()
    }
}

/// Which side of a node's relationships to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    pub fn includes_outgoing(&self) -> bool {
        matches!(self, Direction::Outgoing | Direction::Both)
    }

    pub fn includes_incoming(&self) -> bool {
        matches!(self, Direction::Incoming | Direction::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "NodeId(42)");

        let id2: NodeId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_relationship_id() {
        let id = RelationshipId::new(99);
        assert_eq!(id.as_u64(), 99);
        assert_eq!(format!("{}", id), "RelationshipId(99)");
    }

    #[test]
    fn test_entity_id_conversions() {
        let node: EntityId = NodeId::new(3).into();
        let rel: EntityId = RelationshipId::new(3).into();
        assert_ne!(node, rel);
        assert_eq!(format!("{}", node), "NodeId(3)");
    }

    #[test]
    fn test_label_and_type() {
        let label: Label = "User".into();
        assert_eq!(label.as_str(), "User");
        assert_eq!(format!("{}", RelationshipType::new("KNOWS")), "KNOWS");
    }

    #[test]
    fn test_direction() {
        assert!(Direction::Both.includes_outgoing());
        assert!(Direction::Both.includes_incoming());
        assert!(!Direction::Outgoing.includes_incoming());
        assert!(!Direction::Incoming.includes_outgoing());
    }
}
