//! Engine entry point and transaction handles.
//!
//! This module provides the `Weft` struct, the primary entry point for all
//! transactional operations, and the `Transaction` handle tying a context's
//! lifetime to its reader registration in the store.

use crate::error::{Error, Result};
use crate::multimap::{ReadView, TransactionalMultimap};
use std::hash::Hash;
use std::sync::Arc;
use weft_concurrency::{Snapshot, TransactionContext, TransactionManager, TransactionStatus};
use weft_core::Version;
use weft_storage::VersionedStore;

/// The Weft engine.
///
/// A shared handle to one transactional multimap. Cloning is cheap (two
/// `Arc` clones) and every clone operates on the same data.
///
/// # Example
///
/// ```ignore
/// use weft::prelude::*;
///
/// let engine: Weft<String, i64> = Weft::new();
///
/// let mut txn = engine.begin();
/// txn.multimap().insert("scores".to_string(), 42)?;
/// txn.commit()?;
/// ```
pub struct Weft<K, V> {
    store: Arc<VersionedStore<K, V>>,
    manager: Arc<TransactionManager>,
}

impl<K, V> Weft<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// Create an empty engine at version 0.
    pub fn new() -> Self {
        Self {
            store: Arc::new(VersionedStore::new()),
            manager: Arc::new(TransactionManager::new()),
        }
    }

    /// Begin a transaction against the current committed version.
    ///
    /// Never blocks on other transactions; the snapshot is one `Arc` clone.
    /// Snapshot acquisition and reader registration are one atomic step, so
    /// a commit can never slip between them and have its record pruned
    /// before this transaction is visible to retention.
    pub fn begin(&self) -> Transaction<K, V> {
        let (version, view) = self.store.begin_snapshot();
        tracing::trace!(base = version, "transaction begun");
        Transaction {
            ctx: TransactionContext::new(Snapshot::new(version, view)),
            store: Arc::clone(&self.store),
            manager: Arc::clone(&self.manager),
            finished: false,
        }
    }

    /// A read-only view of the current committed state.
    ///
    /// The view is a fixed snapshot: later commits are invisible to it. It
    /// has no mutating operations and never conflicts with anyone.
    pub fn read_view(&self) -> ReadView<K, V> {
        let (version, view) = self.store.snapshot_parts();
        ReadView::new(Snapshot::new(version, view))
    }

    /// The current committed version.
    pub fn version(&self) -> Version {
        self.store.version()
    }

    /// Run `f` inside a single transaction attempt.
    ///
    /// Commits if `f` returns `Ok`, aborts if it returns `Err` or the
    /// commit conflicts. Never retries; retry policy belongs to the caller,
    /// typically a loop over `execute` while [`Error::is_retryable`].
    pub fn execute<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TransactionalMultimap<'_, K, V>) -> Result<T>,
    {
        let mut txn = self.begin();
        let mut map = txn.multimap();
        match f(&mut map) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                txn.abort();
                Err(err)
            }
        }
    }
}

impl<K, V> Default for Weft<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for Weft<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            manager: Arc::clone(&self.manager),
        }
    }
}

/// One in-flight transaction.
///
/// Thread-confined: the handle moves between threads but is never shared.
/// Dropping an undecided transaction aborts it.
pub struct Transaction<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    ctx: TransactionContext<K, V>,
    store: Arc<VersionedStore<K, V>>,
    manager: Arc<TransactionManager>,
    finished: bool,
}

impl<K, V> Transaction<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// The committed version this transaction reads from.
    pub fn base_version(&self) -> Version {
        self.ctx.base_version()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> &TransactionStatus {
        self.ctx.status()
    }

    /// The transactional multimap view of this transaction.
    pub fn multimap(&mut self) -> TransactionalMultimap<'_, K, V> {
        TransactionalMultimap::new(&mut self.ctx)
    }

    /// Attempt to commit.
    ///
    /// On success returns the commit version (the base version for a
    /// read-only transaction). On conflict the transaction is aborted and
    /// `Error::Conflict` returned; nothing was published.
    pub fn commit(mut self) -> Result<Version> {
        let outcome = self.manager.commit(&mut self.ctx, &self.store);
        self.release();
        outcome.map_err(Error::from)
    }

    /// Abort, discarding all buffered writes.
    ///
    /// Always succeeds and never blocks.
    pub fn abort(mut self) {
        self.manager.abort(&mut self.ctx, "aborted by caller");
        self.release();
    }

    /// Drop the reader registration exactly once.
    fn release(&mut self) {
        if !self.finished {
            self.finished = true;
            self.store.release_reader(self.ctx.base_version());
        }
    }
}

impl<K, V> Drop for Transaction<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        if !self.finished {
            if self.ctx.status().is_active() {
                self.manager.abort(&mut self.ctx, "dropped without commit");
            }
            self.release();
        }
    }
}
