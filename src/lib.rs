//! reachgraph
//!
//! An in-memory property graph with label-scoped exact-match indexes,
//! single-writer transactions over immutable snapshots, and a bounded
//! breadth-first traversal engine with a small social-network query layer on
//! top.
//!
//! # Layers
//!
//! - `graph`: nodes, relationships, property bags and the store that owns them
//! - `index`: per (label, key) value indexes kept in step with every mutation
//! - `transaction` / `database`: clone-on-begin transactions, atomic commit
//! - `traversal`: breadth-first traversal with depth, uniqueness and exclusion
//! - `query`: friends at depth N, likes of friends, most liked
//! - `config` / `fixture`: YAML configuration and datasets
//!
//! ## Example Usage
//!
//! ```rust
//! use reachgraph::{Database, DatabaseConfig, GraphError, QueryEngine, Seed};
//!
//! let config = DatabaseConfig::default().with_index("User", ["name"]);
//! let db = Database::open(config).unwrap();
//!
//! db.write(|tx| {
//!     let me = tx.create_node("User");
//!     tx.set_node_property(me, "name", "me")?;
//!     let friend = tx.create_node("User");
//!     tx.set_node_property(friend, "name", "user2")?;
//!     tx.create_relationship(me, friend, "KNOWS")?;
//!     Ok::<_, GraphError>(())
//! })
//! .unwrap();
//!
//! let snapshot = db.snapshot();
//! let friends = QueryEngine::new()
//!     .direct_neighbors(&snapshot, &Seed::lookup("User", "name", "me"))
//!     .unwrap();
//! assert_eq!(friends.len(), 1);
//! assert_eq!(friends[0].get_str("name"), Some("user2"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod fixture;
pub mod graph;
pub mod index;
pub mod query;
pub mod transaction;
pub mod traversal;

// Re-export main types for convenience
pub use graph::{
    Direction, EntityId, ErrorKind, GraphError, GraphResult, GraphStore, Label, Node, NodeId,
    PropertyBag, PropertyValue, Relationship, RelationshipId, RelationshipType, StoreOptions, ValueType,
};

pub use index::{IndexManager, PropertyIndex, PropertyIndexKey};

pub use config::{ConfigError, DatabaseConfig, IndexConfig};
pub use database::Database;
pub use fixture::{Fixture, FixtureError};
pub use transaction::{Snapshot, Transaction};

pub use traversal::{DepthMode, Reached, TraversalDescription, Traverser, Uniqueness};

pub use query::{Exclusion, GroupCount, LikeRecord, NodeRecord, QueryEngine, Seed};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
