//! Traversal descriptions
//!
//! A [`TraversalDescription`] is a reusable, immutable recipe: which
//! relationships to follow, how deep to go, what uniqueness rule applies and
//! which nodes must never be reported. Calling
//! [`traverse`](TraversalDescription::traverse) starts a fresh, lazy
//! [`Traverser`] over one store.

use super::traverser::Traverser;
use crate::graph::{Direction, GraphResult, GraphStore, NodeId, Relationship, RelationshipType};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Which depths a traversal reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Only nodes at exactly this depth
    Exact(u32),
    /// Every node at depth `1..=n`
    UpTo(u32),
}

impl DepthMode {
    pub fn max_depth(&self) -> u32 {
        match self {
            DepthMode::Exact(n) | DepthMode::UpTo(n) => *n,
        }
    }

    pub fn includes(&self, depth: u32) -> bool {
        match self {
            DepthMode::Exact(n) => depth == *n,
            DepthMode::UpTo(n) => depth >= 1 && depth <= *n,
        }
    }
}

impl Default for DepthMode {
    fn default() -> Self {
        DepthMode::Exact(1)
    }
}

/// What a traversal may not repeat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Uniqueness {
    /// Each node is reached at most once per traversal; seeds count as reached
    #[default]
    NodeGlobal,
    /// Each relationship is followed at most once per traversal
    RelationshipGlobal,
    /// A single walk never reuses a relationship; nodes may repeat
    RelationshipPath,
    /// Every walk up to the depth bound
    None,
}

/// Predicate selecting nodes that are expanded but never reported
pub type ExcludeFn = Arc<dyn Fn(NodeId) -> bool + Send + Sync>;

/// Builder for breadth-first traversals
#[derive(Clone, Default)]
pub struct TraversalDescription {
    expanders: Vec<(RelationshipType, Direction)>,
    direction: Direction,
    depth: DepthMode,
    uniqueness: Uniqueness,
    excluded_nodes: FxHashSet<NodeId>,
    exclude: Option<ExcludeFn>,
}

impl TraversalDescription {
    /// Follow any relationship type outgoing, report depth 1, node-global uniqueness
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow relationships of `rel_type` in `direction`. May be called
    /// repeatedly; with no call at all, every type is followed.
    pub fn relationships(mut self, rel_type: impl Into<RelationshipType>, direction: Direction) -> Self {
        self.expanders.push((rel_type.into(), direction));
        self
    }

    /// Direction used when no relationship type has been given
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn depth(mut self, depth: DepthMode) -> Self {
        self.depth = depth;
        self
    }

    pub fn at_depth(self, depth: u32) -> Self {
        self.depth(DepthMode::Exact(depth))
    }

    pub fn up_to_depth(self, depth: u32) -> Self {
        self.depth(DepthMode::UpTo(depth))
    }

    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Never report nodes matching `predicate`. They are still expanded, so
    /// nodes behind them remain reachable.
    pub fn exclude<F>(mut self, predicate: F) -> Self
    where
        F: Fn(NodeId) -> bool + Send + Sync + 'static,
    {
        self.exclude = Some(Arc::new(predicate));
        self
    }

    /// Never report these nodes. Combines with [`exclude`](Self::exclude).
    pub fn exclude_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.excluded_nodes.extend(nodes);
        self
    }

    pub fn depth_mode(&self) -> DepthMode {
        self.depth
    }

    pub fn uniqueness_mode(&self) -> Uniqueness {
        self.uniqueness
    }

    /// Start a traversal from `seeds`. Fails with `NotFound` if a seed does
    /// not exist. Under node-global uniqueness seeds are never reported.
    pub fn traverse<'g>(
        &self,
        store: &'g GraphStore,
        seeds: impl IntoIterator<Item = NodeId>,
    ) -> GraphResult<Traverser<'g>> {
        let mut unique = Vec::new();
        for seed in seeds {
            store.node(seed)?;
            if !unique.contains(&seed) {
                unique.push(seed);
            }
        }
        Ok(Traverser::new(store, self.clone(), unique))
    }

    pub(crate) fn is_excluded(&self, node: NodeId) -> bool {
        self.excluded_nodes.contains(&node) || self.exclude.as_ref().map_or(false, |f| f(node))
    }

    /// Whether `rel`, seen from `from`, may be followed
    pub(crate) fn follows(&self, rel: &Relationship, from: NodeId) -> bool {
        if self.expanders.is_empty() {
            return leaves_in(self.direction, rel, from);
        }
        self.expanders
            .iter()
            .any(|(rel_type, direction)| &rel.rel_type == rel_type && leaves_in(*direction, rel, from))
    }
}

fn leaves_in(direction: Direction, rel: &Relationship, from: NodeId) -> bool {
    (direction.includes_outgoing() && rel.source == from) || (direction.includes_incoming() && rel.target == from)
}

impl fmt::Debug for TraversalDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalDescription")
            .field("expanders", &self.expanders)
            .field("direction", &self.direction)
            .field("depth", &self.depth)
            .field("uniqueness", &self.uniqueness)
            .field("excluded_nodes", &self.excluded_nodes.len())
            .field("exclude", &self.exclude.is_some())
            .finish()
    }
}
