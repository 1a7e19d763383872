//! Manager for property indices
//!
//! Handles creation, deletion, and access to property indices, and applies
//! the [`IndexEvent`]s the store emits so that every index matches the data
//! it covers.

use super::property_index::{PropertyIndex, TypeMismatch};
use crate::graph::{GraphError, GraphResult, IndexEvent, Label, NodeId, PropertyValue};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Key for identifying a property index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyIndexKey {
    pub label: Label,
    pub property: String,
}

impl PropertyIndexKey {
    pub fn new(label: impl Into<Label>, property: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            property: property.into(),
        }
    }
}

/// Manager for all property indices
#[derive(Debug, Clone, Default)]
pub struct IndexManager {
    indices: HashMap<PropertyIndexKey, PropertyIndex>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an index for a label and property. Replaces any existing index
    /// on the same key; the store uses this after building a backfilled index.
    pub(crate) fn install(&mut self, key: PropertyIndexKey, index: PropertyIndex) {
        debug!(
            "Installed index on :{}({}) with {} entries",
            key.label,
            key.property,
            index.entry_count()
        );
        self.indices.insert(key, index);
    }

    /// Drop an index. Returns whether it existed.
    pub fn drop_index(&mut self, label: &Label, property: &str) -> bool {
        let key = PropertyIndexKey::new(label, property);
        self.indices.remove(&key).is_some()
    }

    /// Check if an index exists
    pub fn has_index(&self, label: &Label, property: &str) -> bool {
        self.indices.contains_key(&PropertyIndexKey::new(label, property))
    }

    /// Get index for querying
    pub fn get_index(&self, label: &Label, property: &str) -> Option<&PropertyIndex> {
        self.indices.get(&PropertyIndexKey::new(label, property))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Exact-match lookup. Empty when nothing matches or no such index exists.
    pub fn lookup(&self, label: &Label, property: &str, value: &PropertyValue) -> BTreeSet<NodeId> {
        self.get_index(label, property)
            .map(|index| index.get(value))
            .unwrap_or_default()
    }

    /// Reject an event that would put a mistyped value into any index.
    /// Runs before the store touches the node, so a failure changes nothing.
    pub fn validate(&self, event: &IndexEvent) -> GraphResult<()> {
        match event {
            IndexEvent::NodeCreated { labels, properties, .. } => {
                for (key, value) in properties {
                    self.check_labels(labels, key, value)?;
                }
                Ok(())
            }
            IndexEvent::PropertySet { labels, key, new_value, .. } => {
                self.check_labels(labels, key, new_value)
            }
            IndexEvent::LabelAdded { label, properties, .. } => {
                for (key, value) in properties {
                    self.check_labels(std::slice::from_ref(label), key, value)?;
                }
                Ok(())
            }
            IndexEvent::NodeDeleted { .. } | IndexEvent::PropertyRemoved { .. } => Ok(()),
        }
    }

    /// Apply an already validated event
    pub fn apply(&mut self, event: IndexEvent) {
        match event {
            IndexEvent::NodeCreated { id, labels, properties } => {
                for (key, value) in properties {
                    self.on_property_set(id, &labels, &key, None, &value);
                }
            }
            IndexEvent::NodeDeleted { id, labels, properties } => {
                self.on_node_deleted(id, &labels, &properties);
            }
            IndexEvent::PropertySet { id, labels, key, old_value, new_value } => {
                self.on_property_set(id, &labels, &key, old_value.as_ref(), &new_value);
            }
            IndexEvent::PropertyRemoved { id, labels, key, old_value } => {
                self.on_property_removed(id, &labels, &key, &old_value);
            }
            IndexEvent::LabelAdded { id, label, properties } => {
                self.on_label_added(id, &label, &properties);
            }
        }
    }

    fn on_property_set(
        &mut self,
        node_id: NodeId,
        labels: &[Label],
        property: &str,
        old_value: Option<&PropertyValue>,
        new_value: &PropertyValue,
    ) {
        for label in labels {
            if let Some(index) = self.indices.get_mut(&PropertyIndexKey::new(label, property)) {
                if let Some(old) = old_value {
                    index.remove(old, node_id);
                }
                index.insert(new_value.clone(), node_id);
            }
        }
    }

    fn on_property_removed(
        &mut self,
        node_id: NodeId,
        labels: &[Label],
        property: &str,
        old_value: &PropertyValue,
    ) {
        for label in labels {
            if let Some(index) = self.indices.get_mut(&PropertyIndexKey::new(label, property)) {
                index.remove(old_value, node_id);
            }
        }
    }

    fn on_label_added(&mut self, node_id: NodeId, label: &Label, properties: &crate::graph::PropertyBag) {
        for (key, value) in properties {
            self.on_property_set(node_id, std::slice::from_ref(label), key, None, value);
        }
    }

    fn on_node_deleted(
        &mut self,
        node_id: NodeId,
        labels: &[Label],
        properties: &crate::graph::PropertyBag,
    ) {
        for (key, value) in properties {
            self.on_property_removed(node_id, labels, key, value);
        }
    }

    fn check_labels(&self, labels: &[Label], property: &str, value: &PropertyValue) -> GraphResult<()> {
        for label in labels {
            if let Some(index) = self.indices.get(&PropertyIndexKey::new(label, property)) {
                index
                    .check(value)
                    .map_err(|mismatch| type_error(property, mismatch))?;
            }
        }
        Ok(())
    }
}

pub(crate) fn type_error(property: &str, mismatch: TypeMismatch) -> GraphError {
    GraphError::InvalidPropertyType {
        key: property.to_string(),
        expected: mismatch.expected,
        found: mismatch.found,
    }
}
