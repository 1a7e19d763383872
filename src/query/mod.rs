//! Query engine
//!
//! Social-network queries composed from traversals:
//! - direct neighbors of a seed
//! - friends at exactly N hops, with configurable exclusion of closer friends
//! - pattern matches at N hops (nodes may repeat, relationships may not)
//! - likes of friends, and the liked nodes grouped and counted
//!
//! Every call is a pure read over one store.

pub mod record;

pub use record::{order_by, order_by_count_desc, GroupCount, LikeRecord, NodeRecord};

use crate::graph::{Direction, GraphResult, GraphStore, Label, NodeId, PropertyValue, RelationshipType};
use crate::traversal::{Reached, TraversalDescription, Uniqueness};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Where a query starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Node(NodeId),
    /// The single node an index lookup returns
    Lookup {
        label: Label,
        key: String,
        value: PropertyValue,
    },
}

impl Seed {
    pub fn lookup(label: impl Into<Label>, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Seed::Lookup {
            label: label.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<NodeId> for Seed {
    fn from(id: NodeId) -> Self {
        Seed::Node(id)
    }
}

/// Which friends closer than the requested depth are suppressed.
/// Only depths above 1 are affected: a one-hop query always reports the
/// direct friends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Exclusion {
    None,
    /// Nodes adjacent to the seed through the friend type, either direction
    #[default]
    DirectNeighbors,
    /// Every node reachable in fewer hops than requested. Friend traversals
    /// visit each node once, at its shortest distance, so this already holds
    /// for every result and the mode behaves like `None`.
    AllCloser,
}

/// Query engine - high-level interface for friend-graph queries
#[derive(Debug, Clone)]
pub struct QueryEngine {
    friend_type: RelationshipType,
    like_type: RelationshipType,
}

impl QueryEngine {
    /// Engine over `KNOWS` friendships and `LIKES` relationships
    pub fn new() -> Self {
        Self::with_relationship_types("KNOWS", "LIKES")
    }

    pub fn with_relationship_types(
        friend_type: impl Into<RelationshipType>,
        like_type: impl Into<RelationshipType>,
    ) -> Self {
        Self {
            friend_type: friend_type.into(),
            like_type: like_type.into(),
        }
    }

    /// Resolve a seed to a node. A lookup with no match resolves to `None`;
    /// one with several matches fails with `Conflict`.
    pub fn resolve(&self, store: &GraphStore, seed: &Seed) -> GraphResult<Option<NodeId>> {
        match seed {
            Seed::Node(id) => store.node(*id).map(|node| Some(node.id)),
            Seed::Lookup { label, key, value } => store.lookup_single(label, key, value),
        }
    }

    /// Friends one hop away
    pub fn direct_neighbors(&self, store: &GraphStore, seed: &Seed) -> GraphResult<Vec<NodeRecord>> {
        self.friends_at_depth(store, seed, 1, Exclusion::None)
    }

    /// Friends first reached at exactly `depth` hops
    pub fn friends_at_depth(
        &self,
        store: &GraphStore,
        seed: &Seed,
        depth: u32,
        exclusion: Exclusion,
    ) -> GraphResult<Vec<NodeRecord>> {
        let Some(start) = self.resolve(store, seed)? else {
            return Ok(Vec::new());
        };

        let excluded = self.excluded_for(store, start, depth, exclusion)?;
        let reached = self
            .friends()
            .at_depth(depth)
            .exclude_nodes(excluded)
            .traverse(store, [start])?;
        let records = to_records(store, reached);
        debug!("{} friends at depth {} of node {}", records.len(), depth, start);
        Ok(records)
    }

    /// Distinct end nodes of every friend walk of exactly `depth` hops that
    /// uses no relationship twice. Nodes may repeat along a walk, so the seed
    /// itself and closer friends can appear.
    pub fn pattern_at_depth(&self, store: &GraphStore, seed: &Seed, depth: u32) -> GraphResult<Vec<NodeRecord>> {
        let Some(start) = self.resolve(store, seed)? else {
            return Ok(Vec::new());
        };

        let mut seen = FxHashSet::default();
        let reached = self
            .friends()
            .at_depth(depth)
            .uniqueness(Uniqueness::RelationshipPath)
            .traverse(store, [start])?
            .filter(|reached| seen.insert(reached.node));
        Ok(to_records(store, reached))
    }

    /// Every (friend, liked node) pair for friends up to `friend_depth` hops
    /// away, friends in breadth-first order and likes in creation order
    pub fn likes_of_friends(
        &self,
        store: &GraphStore,
        seed: &Seed,
        friend_depth: u32,
    ) -> GraphResult<Vec<LikeRecord>> {
        let Some(start) = self.resolve(store, seed)? else {
            return Ok(Vec::new());
        };

        let friends: Vec<Reached> = self
            .friends()
            .up_to_depth(friend_depth)
            .traverse(store, [start])?
            .collect();

        let likes = TraversalDescription::new()
            .relationships(self.like_type.clone(), Direction::Outgoing)
            .at_depth(1)
            .uniqueness(Uniqueness::RelationshipGlobal);

        let mut pairs = Vec::new();
        for friend in friends {
            let Some(friend_node) = store.get_node(friend.node) else {
                continue;
            };
            let friend_record = NodeRecord::from_node(friend_node, friend.depth);
            for liked in likes.traverse(store, [friend.node])? {
                if let Some(liked_node) = store.get_node(liked.node) {
                    pairs.push(LikeRecord {
                        friend: friend_record.clone(),
                        liked: NodeRecord::from_node(liked_node, liked.depth),
                    });
                }
            }
        }
        Ok(pairs)
    }

    /// Nodes liked by friends up to `friend_depth` hops away, counted and
    /// sorted by count descending. Equal counts keep first-encounter order.
    pub fn most_liked(&self, store: &GraphStore, seed: &Seed, friend_depth: u32) -> GraphResult<Vec<GroupCount>> {
        let mut groups: IndexMap<NodeId, GroupCount> = IndexMap::new();
        for pair in self.likes_of_friends(store, seed, friend_depth)? {
            groups
                .entry(pair.liked.id)
                .or_insert_with(|| GroupCount {
                    node: pair.liked,
                    count: 0,
                })
                .count += 1;
        }

        let mut groups: Vec<GroupCount> = groups.into_values().collect();
        order_by_count_desc(&mut groups);
        Ok(groups)
    }

    fn friends(&self) -> TraversalDescription {
        TraversalDescription::new().relationships(self.friend_type.clone(), Direction::Outgoing)
    }

    fn excluded_for(
        &self,
        store: &GraphStore,
        start: NodeId,
        depth: u32,
        exclusion: Exclusion,
    ) -> GraphResult<Vec<NodeId>> {
        match exclusion {
            Exclusion::DirectNeighbors if depth > 1 => {
                store.neighbors(start, Direction::Both, Some(&self.friend_type))
            }
            Exclusion::None | Exclusion::DirectNeighbors | Exclusion::AllCloser => Ok(Vec::new()),
        }
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_records(store: &GraphStore, reached: impl Iterator<Item = Reached>) -> Vec<NodeRecord> {
    reached
        .filter_map(|r| store.get_node(r.node).map(|node| NodeRecord::from_node(node, r.depth)))
        .collect()
}
