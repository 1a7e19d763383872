//! YAML dataset loader
//!
//! A fixture declares indexes, nodes and relationships. Nodes carry a
//! fixture-local `key` that relationships refer to; loading returns the
//! mapping from those keys to the ids the store assigned.

use crate::config::IndexConfig;
use crate::database::Database;
use crate::graph::{GraphError, GraphStore, Label, NodeId, PropertyBag, RelationshipType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const SOCIAL_NETWORK: &str = include_str!("../fixtures/social_network.yaml");

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Relationship refers to unknown node key: {0}")]
    UnknownNode(String),

    #[error("Duplicate node key: {0}")]
    DuplicateKey(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FixtureResult<T> = Result<T, FixtureError>;

/// Key -> node id mapping produced by a load
pub type NodeKeys = IndexMap<String, NodeId>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub key: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSpec {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    #[serde(default)]
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub indexes: Vec<IndexConfig>,
    pub nodes: Vec<NodeSpec>,
    pub relationships: Vec<RelationshipSpec>,
}

impl Fixture {
    pub fn from_yaml_str(yaml: &str) -> FixtureResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Eight users who know each other and the seven websites they like
    pub fn social_network() -> FixtureResult<Self> {
        Self::from_yaml_str(SOCIAL_NETWORK)
    }

    /// Load into `db` in a single transaction; nothing is committed on error
    pub fn load(&self, db: &Database) -> FixtureResult<NodeKeys> {
        let keys = db.write(|tx| self.load_into(tx))?;
        info!(
            "Loaded fixture: {} nodes, {} relationships",
            self.nodes.len(),
            self.relationships.len()
        );
        Ok(keys)
    }

    /// Load into a store or an open transaction
    pub fn load_into(&self, store: &mut GraphStore) -> FixtureResult<NodeKeys> {
        for index in &self.indexes {
            for key in &index.keys {
                store.create_index(index.label.clone(), key.clone())?;
            }
        }

        let mut keys = NodeKeys::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if keys.contains_key(&node.key) {
                return Err(FixtureError::DuplicateKey(node.key.clone()));
            }
            let id = store.create_node_with_properties(node.labels.clone(), node.properties.clone())?;
            keys.insert(node.key.clone(), id);
        }

        for rel in &self.relationships {
            let from = resolve(&keys, &rel.from)?;
            let to = resolve(&keys, &rel.to)?;
            store.create_relationship_with_properties(from, to, rel.rel_type.clone(), rel.properties.clone())?;
        }

        Ok(keys)
    }
}

fn resolve(keys: &NodeKeys, key: &str) -> FixtureResult<NodeId> {
    keys.get(key)
        .copied()
        .ok_or_else(|| FixtureError::UnknownNode(key.to_string()))
}
