//! Lazy breadth-first traverser

use super::description::{TraversalDescription, Uniqueness};
use crate::graph::{Direction, GraphStore, NodeId, RelationshipId};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::VecDeque;

/// A node reported by a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Reached {
    pub node: NodeId,
    /// Number of relationships between the seed and this node
    pub depth: u32,
    /// Relationship the node was reached through
    pub via: RelationshipId,
}

#[derive(Debug)]
struct Frontier {
    node: NodeId,
    depth: u32,
    /// Relationships on the walk so far; tracked only for path uniqueness
    path: Vec<RelationshipId>,
}

/// Iterator over the nodes a [`TraversalDescription`] reaches
///
/// Output is breadth-first: by depth, then by the creation order of the
/// relationships followed. Work happens only as items are pulled.
pub struct Traverser<'g> {
    store: &'g GraphStore,
    description: TraversalDescription,
    queue: VecDeque<Frontier>,
    pending: VecDeque<Reached>,
    visited_nodes: FxHashSet<NodeId>,
    visited_rels: FxHashSet<RelationshipId>,
}

impl<'g> Traverser<'g> {
    pub(crate) fn new(store: &'g GraphStore, description: TraversalDescription, seeds: Vec<NodeId>) -> Self {
        let mut visited_nodes = FxHashSet::default();
        let mut queue = VecDeque::with_capacity(seeds.len());
        for seed in seeds {
            visited_nodes.insert(seed);
            queue.push_back(Frontier {
                node: seed,
                depth: 0,
                path: Vec::new(),
            });
        }

        Self {
            store,
            description,
            queue,
            pending: VecDeque::new(),
            visited_nodes,
            visited_rels: FxHashSet::default(),
        }
    }

    /// Just the node ids
    pub fn nodes(self) -> impl Iterator<Item = NodeId> + 'g {
        self.map(|reached| reached.node)
    }

    fn expand(&mut self, frontier: Frontier) {
        let depth = frontier.depth + 1;
        let max_depth = self.description.depth_mode().max_depth();
        let uniqueness = self.description.uniqueness_mode();

        // Snapshot reads never fail for a node taken from the queue
        let Ok(rels) = self.store.relationships_of(frontier.node, Direction::Both, None) else {
            return;
        };

        for rel in rels {
            if !self.description.follows(rel, frontier.node) {
                continue;
            }
            let Some(next) = rel.other_node(frontier.node) else {
                continue;
            };

            let admitted = match uniqueness {
                Uniqueness::NodeGlobal => self.visited_nodes.insert(next),
                Uniqueness::RelationshipGlobal => self.visited_rels.insert(rel.id),
                Uniqueness::RelationshipPath => !frontier.path.contains(&rel.id),
                Uniqueness::None => true,
            };
            if !admitted {
                continue;
            }

            if depth < max_depth {
                let path = if uniqueness == Uniqueness::RelationshipPath {
                    let mut path = frontier.path.clone();
                    path.push(rel.id);
                    path
                } else {
                    Vec::new()
                };
                self.queue.push_back(Frontier { node: next, depth, path });
            }

            if self.description.depth_mode().includes(depth) && !self.description.is_excluded(next) {
                self.pending.push_back(Reached {
                    node: next,
                    depth,
                    via: rel.id,
                });
            }
        }
    }
}

impl Iterator for Traverser<'_> {
    type Item = Reached;

    fn next(&mut self) -> Option<Reached> {
        loop {
            if let Some(reached) = self.pending.pop_front() {
                return Some(reached);
            }
            let frontier = self.queue.pop_front()?;
            if frontier.depth < self.description.depth_mode().max_depth() {
                self.expand(frontier);
            }
        }
    }
}

impl std::fmt::Debug for Traverser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Traverser")
            .field("description", &self.description)
            .field("queued", &self.queue.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
