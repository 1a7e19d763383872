//! Exact-match property index
//!
//! Maps each value of one (label, key) pair to the set of nodes currently
//! holding it. An index holds values of a single [`ValueType`], fixed by the
//! first value inserted and released again once the index is empty.

use crate::graph::{NodeId, PropertyValue, ValueType};
use std::collections::{BTreeMap, BTreeSet};

/// A value whose type does not match the type an index already holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: ValueType,
    pub found: ValueType,
}

/// Index for a specific property on a specific label
#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    value_type: Option<ValueType>,
    /// Value -> Set of NodeIds
    index: BTreeMap<PropertyValue, BTreeSet<NodeId>>,
}

impl PropertyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from existing (value, node) pairs, rejecting mixed types.
    pub fn build<I>(entries: I) -> Result<Self, TypeMismatch>
    where
        I: IntoIterator<Item = (PropertyValue, NodeId)>,
    {
        let mut index = Self::new();
        for (value, node_id) in entries {
            index.check(&value)?;
            index.insert(value, node_id);
        }
        Ok(index)
    }

    /// The value type this index currently holds, if any
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Check that `value` may be stored in this index
    pub fn check(&self, value: &PropertyValue) -> Result<(), TypeMismatch> {
        match self.value_type {
            Some(expected) if expected != value.value_type() => Err(TypeMismatch {
                expected,
                found: value.value_type(),
            }),
            _ => Ok(()),
        }
    }

    /// Callers run [`check`](Self::check) first; insert itself does not re-validate.
    pub fn insert(&mut self, value: PropertyValue, node_id: NodeId) {
        if self.value_type.is_none() {
            self.value_type = Some(value.value_type());
        }
        self.index.entry(value).or_default().insert(node_id);
    }

    pub fn remove(&mut self, value: &PropertyValue, node_id: NodeId) {
        if let Some(nodes) = self.index.get_mut(value) {
            nodes.remove(&node_id);
            if nodes.is_empty() {
                self.index.remove(value);
            }
        }
        if self.index.is_empty() {
            self.value_type = None;
        }
    }

    pub fn get(&self, value: &PropertyValue) -> BTreeSet<NodeId> {
        self.index.get(value).cloned().unwrap_or_default()
    }

    pub fn contains(&self, value: &PropertyValue, node_id: NodeId) -> bool {
        self.index
            .get(value)
            .map_or(false, |nodes| nodes.contains(&node_id))
    }

    /// Number of distinct values
    pub fn value_count(&self) -> usize {
        self.index.len()
    }

    /// Number of (value, node) entries
    pub fn entry_count(&self) -> usize {
        self.index.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyValue, &BTreeSet<NodeId>)> {
        self.index.iter()
    }
}
