//! Transactions and snapshots
//!
//! A [`Transaction`] owns a private working copy of the committed store and
//! holds the database's writer lock for its whole lifetime. Mutations go to
//! the copy; [`Transaction::commit`] publishes it with a single pointer swap.
//! Anything else (explicit rollback, a failed mark, an early return or a
//! panic unwinding through the owner) drops the copy and the committed state
//! is untouched.
//!
//! A [`Snapshot`] is a shared, immutable committed version. Readers keep
//! theirs for as long as they like; later commits never change it.

use crate::database::Database;
use crate::graph::{GraphError, GraphResult, GraphStore};
use parking_lot::MutexGuard;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TxState {
    Active,
    Failed(String),
}

/// A single-writer transaction over a [`Database`]
///
/// Dereferences to [`GraphStore`], so every store operation is available
/// directly on the transaction.
///
/// Beginning a transaction clones the whole committed store, so each one
/// costs time and memory proportional to the graph. Group related writes
/// into one transaction rather than committing them one at a time.
pub struct Transaction<'db> {
    db: &'db Database,
    working: GraphStore,
    id: u64,
    base_version: u64,
    state: TxState,
    finished: bool,
    _writer: MutexGuard<'db, ()>,
}

impl<'db> Transaction<'db> {
    pub(crate) fn begin(db: &'db Database, writer: MutexGuard<'db, ()>, id: u64) -> Self {
        let (working, base_version) = {
            let committed = db.committed.read();
            (GraphStore::clone(&committed.store), committed.version)
        };
        debug!("Transaction {} started from version {}", id, base_version);
        Self {
            db,
            working,
            id,
            base_version,
            state: TxState::Active,
            finished: false,
            _writer: writer,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Version of the committed state this transaction started from
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, TxState::Failed(_))
    }

    /// Mark the transaction as failed. A later [`commit`](Self::commit) rolls
    /// back and reports [`GraphError::TransactionAborted`].
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        debug!("Transaction {} marked failed: {}", self.id, reason);
        self.state = TxState::Failed(reason);
    }

    /// Publish every mutation made in this transaction
    pub fn commit(mut self) -> GraphResult<()> {
        self.finished = true;
        if let TxState::Failed(reason) = &self.state {
            warn!("Transaction {} aborted: {}", self.id, reason);
            return Err(GraphError::TransactionAborted(reason.clone()));
        }

        let working = std::mem::take(&mut self.working);
        let nodes = working.node_count();
        let relationships = working.relationship_count();
        let version = self.db.publish(working);
        info!(
            "Transaction {} committed version {} ({} nodes, {} relationships)",
            self.id, version, nodes, relationships
        );
        Ok(())
    }

    /// Discard every mutation made in this transaction
    pub fn rollback(mut self) {
        self.finished = true;
        debug!("Transaction {} rolled back", self.id);
    }
}

impl Deref for Transaction<'_> {
    type Target = GraphStore;

    fn deref(&self) -> &GraphStore {
        &self.working
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut GraphStore {
        &mut self.working
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("Transaction {} dropped without commit, rolling back", self.id);
        }
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("base_version", &self.base_version)
            .field("state", &self.state)
            .finish()
    }
}

/// An immutable committed version of the store
#[derive(Debug, Clone)]
pub struct Snapshot {
    store: Arc<GraphStore>,
    version: u64,
}

impl Snapshot {
    pub(crate) fn new(store: Arc<GraphStore>, version: u64) -> Self {
        Self { store, version }
    }

    /// Commit counter value this snapshot was taken at (0 = empty database)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }
}

impl Deref for Snapshot {
    type Target = GraphStore;

    fn deref(&self) -> &GraphStore {
        &self.store
    }
}

impl AsRef<GraphStore> for Snapshot {
    fn as_ref(&self) -> &GraphStore {
        &self.store
    }
}
