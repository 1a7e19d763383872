//! Core graph data model
//!
//! This module implements the directed property graph:
//! - Nodes with labels and properties
//! - Typed, directed relationships with properties
//! - An in-memory store that keeps its property indexes in step with every mutation

pub mod event;
pub mod node;
pub mod property;
pub mod relationship;
pub mod store;
pub mod types;

// Re-export main types
pub use event::IndexEvent;
pub use node::Node;
pub use property::{PropertyBag, PropertyValue, ValueType};
pub use relationship::Relationship;
pub use store::{ErrorKind, GraphError, GraphResult, GraphStore, StoreOptions};
pub use types::{Direction, EntityId, Label, NodeId, RelationshipId, RelationshipType};
