//! Map-style facades over a transaction.
//!
//! `TransactionalMultimap` is the mutable per-transaction view: every
//! operation records the read/write markers that make commit-time
//! validation sound. `KeySetView` exposes the key set with the same
//! tracking. `ReadView` is the read-only capability variant: it is backed
//! by a fixed snapshot and has no mutating entry points at all.

use crate::error::Result;
use std::hash::Hash;
use std::sync::Arc;
use weft_concurrency::{Snapshot, TransactionContext};
use weft_core::{ValueSet, Version};

/// Mutable multimap view bound to one active transaction.
///
/// Reads observe the transaction's own uncommitted writes layered over its
/// base snapshot. Whole-map queries (`len`, `is_empty`, `key_set`
/// materialization) depend on the complete key universe and mark it read,
/// which makes the transaction conflict with *any* concurrent commit.
/// Prefer per-key operations under contention.
pub struct TransactionalMultimap<'a, K, V> {
    ctx: &'a mut TransactionContext<K, V>,
}

impl<'a, K, V> TransactionalMultimap<'a, K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub(crate) fn new(ctx: &'a mut TransactionContext<K, V>) -> Self {
        Self { ctx }
    }

    /// Number of keys visible to this transaction.
    ///
    /// Marks the universe read, except after an in-transaction `clear()`
    /// where the count is proven locally.
    pub fn len(&mut self) -> Result<usize> {
        self.ctx.mark_universe_read()?;
        Ok(self.ctx.merged_key_count())
    }

    /// True if no keys are visible to this transaction.
    ///
    /// Same universe dependency as [`len`](Self::len).
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// True if `key` has at least one value.
    pub fn contains_key(&mut self, key: &K) -> Result<bool> {
        Ok(self.ctx.read(key)?.is_some())
    }

    /// The value set mapped to `key`, if any.
    ///
    /// The returned set is a shared immutable snapshot of the mapping at
    /// read time; later writes in this transaction produce new sets.
    pub fn get(&mut self, key: &K) -> Result<Option<Arc<ValueSet<V>>>> {
        Ok(self.ctx.read(key)?)
    }

    /// Add `value` to the set mapped to `key`.
    ///
    /// Returns the previous value set, `None` if the key was absent. The
    /// read of the previous set is tracked like any other read.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<Arc<ValueSet<V>>>> {
        let previous = self.ctx.read(&key)?;
        let mut next: ValueSet<V> = previous
            .as_deref()
            .cloned()
            .unwrap_or_default();
        next.insert(value);
        self.ctx.write(key, next)?;
        Ok(previous)
    }

    /// Remove `key` and its entire value set.
    ///
    /// Returns the previous value set, `None` if the key was absent.
    /// Removing an absent key still registers a write for it.
    pub fn remove(&mut self, key: K) -> Result<Option<Arc<ValueSet<V>>>> {
        let previous = self.ctx.read(&key)?;
        self.ctx.remove(key)?;
        Ok(previous)
    }

    /// Add every (key, value) pair, as repeated [`insert`](Self::insert)s.
    pub fn extend<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Remove every key.
    ///
    /// Publishes as a universe write: committing this transaction conflicts
    /// any concurrent transaction that read anything.
    pub fn clear(&mut self) -> Result<()> {
        Ok(self.ctx.clear()?)
    }

    /// The key-set view of this transaction.
    pub fn key_set(&mut self) -> KeySetView<'_, K, V> {
        KeySetView { ctx: &mut *self.ctx }
    }
}

/// Key-set view bound to one active transaction.
///
/// Observing the set as a whole (length, emptiness, materialization) marks
/// the universe read. Removal through the view removes the key's whole
/// value set from the underlying multimap.
pub struct KeySetView<'a, K, V> {
    ctx: &'a mut TransactionContext<K, V>,
}

impl<K, V> KeySetView<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// Number of keys.
    pub fn len(&mut self) -> Result<usize> {
        self.ctx.mark_universe_read()?;
        Ok(self.ctx.merged_key_count())
    }

    /// True if there are no keys.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// True if `key` is present.
    pub fn contains(&mut self, key: &K) -> Result<bool> {
        Ok(self.ctx.read(key)?.is_some())
    }

    /// Materialize the keys in no particular order.
    pub fn to_vec(&mut self) -> Result<Vec<K>> {
        self.ctx.mark_universe_read()?;
        Ok(self.ctx.merged_keys())
    }

    /// Remove `key` (and its value set) through the view.
    ///
    /// Returns whether the key was present. Set-level removal is a
    /// whole-universe observation, so this also marks the universe read.
    pub fn remove(&mut self, key: K) -> Result<bool> {
        self.ctx.mark_universe_read()?;
        let present = self.ctx.read(&key)?.is_some();
        self.ctx.remove(key)?;
        Ok(present)
    }

    /// Remove every key, exactly like the multimap's `clear()`.
    pub fn clear(&mut self) -> Result<()> {
        Ok(self.ctx.clear()?)
    }
}

/// Read-only view over a fixed committed snapshot.
///
/// Has no transaction, no read tracking, and no mutating operations;
/// unsupported mutation is a compile error rather than a runtime failure.
/// Later commits are invisible to an existing view.
pub struct ReadView<K, V> {
    snapshot: Snapshot<K, V>,
}

impl<K, V> ReadView<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub(crate) fn new(snapshot: Snapshot<K, V>) -> Self {
        Self { snapshot }
    }

    /// The committed version this view reflects.
    pub fn version(&self) -> Version {
        self.snapshot.version()
    }

    /// The value set mapped to `key`, if any.
    pub fn get(&self, key: &K) -> Option<&Arc<ValueSet<V>>> {
        self.snapshot.get(key)
    }

    /// True if `key` has at least one value.
    pub fn contains_key(&self, key: &K) -> bool {
        self.snapshot.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// True if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Iterate the keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.snapshot.keys()
    }
}
