//! Graph change events
//!
//! The store describes every index-relevant change as an [`IndexEvent`] and
//! applies it to the [`IndexManager`](crate::index::IndexManager) inside the
//! same call that changed the node.

use super::property::{PropertyBag, PropertyValue};
use super::types::{Label, NodeId};

#[derive(Debug, Clone)]
pub enum IndexEvent {
    NodeCreated {
        id: NodeId,
        labels: Vec<Label>,
        properties: PropertyBag,
    },
    NodeDeleted {
        id: NodeId,
        labels: Vec<Label>,
        properties: PropertyBag,
    },
    PropertySet {
        id: NodeId,
        labels: Vec<Label>,
        key: String,
        old_value: Option<PropertyValue>,
        new_value: PropertyValue,
    },
    PropertyRemoved {
        id: NodeId,
        labels: Vec<Label>,
        key: String,
        old_value: PropertyValue,
    },
    LabelAdded {
        id: NodeId,
        label: Label,
        properties: PropertyBag,
    },
}
