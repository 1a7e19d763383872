//! Database configuration
//!
//! Declares the property indexes to create when a database is opened and the
//! store-wide options. Loaded from YAML:
//!
//! ```yaml
//! unique_relationships: false
//! indexes:
//!   - label: User
//!     keys: [id, name, email]
//!   - label: Website
//!     keys: [id, url]
//! ```

use crate::graph::{Label, StoreOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Indexes declared over one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub label: Label,
    pub keys: Vec<String>,
}

impl IndexConfig {
    pub fn new<I, K>(label: impl Into<Label>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            label: label.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Configuration for [`Database::open`](crate::Database::open)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Indexes to declare on open
    pub indexes: Vec<IndexConfig>,

    /// Reject duplicate (source, target, type) relationships
    pub unique_relationships: bool,
}

impl DatabaseConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Add an index declaration
    pub fn with_index<I, K>(mut self, label: impl Into<Label>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.indexes.push(IndexConfig::new(label, keys));
        self
    }

    pub fn with_unique_relationships(mut self, unique: bool) -> Self {
        self.unique_relationships = unique;
        self
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            unique_relationships: self.unique_relationships,
        }
    }
}
