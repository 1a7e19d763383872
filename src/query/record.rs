//! Result records returned by the query engine
//!
//! Records are detached copies of node data, so they outlive the snapshot
//! they were read from.

use crate::graph::{Label, Node, NodeId, PropertyValue};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A node as returned by a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub id: NodeId,
    /// Traversal depth at which the node was reached
    pub depth: u32,
    pub labels: Vec<Label>,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl NodeRecord {
    pub fn from_node(node: &Node, depth: u32) -> Self {
        Self {
            id: node.id,
            depth,
            labels: node.labels.iter().cloned().collect(),
            properties: node
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// String form of a property, for display
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_string)
    }
}

/// A (friend, liked node) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeRecord {
    pub friend: NodeRecord,
    pub liked: NodeRecord,
}

/// A node with the number of times it was encountered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub node: NodeRecord,
    pub count: usize,
}

/// Stable sort by a property; records missing the key go last
pub fn order_by(records: &mut [NodeRecord], key: &str) {
    records.sort_by(|a, b| match (a.get(key), b.get(key)) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Stable sort by count, highest first; ties keep their current order
pub fn order_by_count_desc(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count));
}
