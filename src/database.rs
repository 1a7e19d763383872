//! Database handle
//!
//! Owns the last committed [`GraphStore`] and serializes writers. Readers
//! take a [`Snapshot`] without waiting on a writer; a writer opens a
//! [`Transaction`] that works on a private copy until it commits.

use crate::config::DatabaseConfig;
use crate::graph::{GraphError, GraphResult, GraphStore};
use crate::transaction::{Snapshot, Transaction};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub(crate) struct Committed {
    pub(crate) store: Arc<GraphStore>,
    pub(crate) version: u64,
}

/// An open in-memory graph database
#[derive(Debug)]
pub struct Database {
    config: DatabaseConfig,
    pub(crate) committed: RwLock<Committed>,
    writer: Mutex<()>,
    next_tx_id: AtomicU64,
}

impl Database {
    /// Open a database and declare the configured indexes
    pub fn open(config: DatabaseConfig) -> GraphResult<Self> {
        let mut store = GraphStore::with_options(config.store_options());
        for index in &config.indexes {
            for key in &index.keys {
                store.create_index(index.label.clone(), key.clone())?;
            }
        }

        info!(
            "Opened database with {} indexes (unique_relationships = {})",
            store.indexes().len(),
            config.unique_relationships
        );

        Ok(Self {
            config,
            committed: RwLock::new(Committed {
                store: Arc::new(store),
                version: 0,
            }),
            writer: Mutex::new(()),
            next_tx_id: AtomicU64::new(1),
        })
    }

    /// An empty database with no indexes
    pub fn in_memory() -> Self {
        Self {
            config: DatabaseConfig::default(),
            committed: RwLock::new(Committed {
                store: Arc::new(GraphStore::new()),
                version: 0,
            }),
            writer: Mutex::new(()),
            next_tx_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Start a write transaction. Blocks while another transaction is open.
    pub fn begin(&self) -> Transaction<'_> {
        let writer = self.writer.lock();
        let id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        Transaction::begin(self, writer, id)
    }

    /// Current committed version
    pub fn snapshot(&self) -> Snapshot {
        let committed = self.committed.read();
        Snapshot::new(Arc::clone(&committed.store), committed.version)
    }

    pub fn version(&self) -> u64 {
        self.committed.read().version
    }

    /// Run `f` against the current committed version
    pub fn read<T>(&self, f: impl FnOnce(&GraphStore) -> T) -> T {
        let snapshot = self.snapshot();
        f(&snapshot)
    }

    /// Run `f` in a transaction. Commits when `f` returns `Ok`, rolls back
    /// when it returns `Err`.
    pub fn write<T, E>(&self, f: impl FnOnce(&mut Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<GraphError>,
    {
        let mut tx = self.begin();
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.rollback();
                Err(e)
            }
        }
    }

    /// Close the database, releasing the committed store. Snapshots still
    /// held elsewhere stay valid.
    pub fn close(self) {
        let committed = self.committed.read();
        info!(
            "Closing database at version {} ({} nodes, {} relationships)",
            committed.version,
            committed.store.node_count(),
            committed.store.relationship_count()
        );
    }

    /// Swap in a new committed store. Caller holds the writer lock.
    pub(crate) fn publish(&self, store: GraphStore) -> u64 {
        let mut committed = self.committed.write();
        committed.store = Arc::new(store);
        committed.version += 1;
        committed.version
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::in_memory()
    }
}
