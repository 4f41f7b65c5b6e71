//! Per-transaction state: overlay, read set, status
//!
//! A `TransactionContext` is thread-confined: it is created at transaction
//! begin, bound to a base snapshot, and destroyed once it reaches a terminal
//! state. It owns a private overlay so a transaction observes its own
//! uncommitted writes, and tracks the keys it has observed for commit-time
//! validation.
//!
//! ## Read-set semantics
//!
//! The read set is tri-state: no keys, specific keys, or the universe
//! marker. Operations whose result depends on the complete key set (size,
//! emptiness, key-set iteration) set the universe marker — unless the
//! transaction has performed a local `clear()`, after which it owns complete
//! knowledge of the universe and universe queries carry no dependency on
//! concurrent state.
//!
//! ## Clear semantics
//!
//! `clear()` collapses the overlay into a single structural tombstone-all.
//! Keys (or a universe marker) recorded in the read set *before* the clear
//! still describe dependencies on the base snapshot and survive for
//! validation; the clear itself is published as a universe write.

use crate::snapshot::Snapshot;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use std::sync::Arc;
use weft_core::{Error, Result, ValueSet, Version, WrittenKeys};

/// Transaction lifecycle state.
///
/// `Active → Committed` via a successful commit, `Active → Aborted` via an
/// explicit abort or failed validation. Both terminal states are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Accepting operations.
    Active,
    /// Writes published (or validated read-only). Terminal.
    Committed,
    /// Discarded without touching global state. Terminal.
    Aborted {
        /// Why the transaction was aborted.
        reason: String,
    },
}

impl TransactionStatus {
    /// True while the transaction accepts operations.
    pub fn is_active(&self) -> bool {
        matches!(self, TransactionStatus::Active)
    }

    /// Short state name for errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            TransactionStatus::Active => "active",
            TransactionStatus::Committed => "committed",
            TransactionStatus::Aborted { .. } => "aborted",
        }
    }
}

/// The keys a transaction has observed.
#[derive(Debug, Clone)]
pub enum ReadSet<K> {
    /// Specific keys (possibly none yet).
    Keys(FxHashSet<K>),
    /// The whole key universe.
    All,
}

impl<K: Eq + Hash> ReadSet<K> {
    /// Record one observed key. No-op once the universe marker is set.
    pub fn record(&mut self, key: K) {
        if let ReadSet::Keys(keys) = self {
            keys.insert(key);
        }
    }

    /// True if the universe marker is set.
    pub fn is_all(&self) -> bool {
        matches!(self, ReadSet::All)
    }

    /// True if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        match self {
            ReadSet::Keys(keys) => keys.is_empty(),
            ReadSet::All => false,
        }
    }
}

/// One overlay entry: a pending local write for a key.
#[derive(Debug, Clone)]
pub enum Pending<V> {
    /// The key maps to this value set.
    Put(Arc<ValueSet<V>>),
    /// The key is removed locally.
    Tombstone,
}

/// One in-flight transaction's private state.
///
/// Thread-confined by convention: a context belongs to exactly one thread
/// at a time and is never shared.
#[derive(Debug)]
pub struct TransactionContext<K, V> {
    base: Snapshot<K, V>,
    overlay: FxHashMap<K, Pending<V>>,
    cleared: bool,
    read_set: ReadSet<K>,
    status: TransactionStatus,
}

impl<K, V> TransactionContext<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// Create a context bound to a base snapshot.
    pub fn new(base: Snapshot<K, V>) -> Self {
        Self {
            base,
            overlay: FxHashMap::default(),
            cleared: false,
            read_set: ReadSet::Keys(FxHashSet::default()),
            status: TransactionStatus::Active,
        }
    }

    /// The version this transaction reads from.
    #[inline]
    pub fn base_version(&self) -> Version {
        self.base.version()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// The keys this transaction has observed so far.
    pub fn read_set(&self) -> &ReadSet<K> {
        &self.read_set
    }

    /// True if the transaction performed a local `clear()`.
    pub fn cleared(&self) -> bool {
        self.cleared
    }

    /// Fail with `NotActive` if the transaction is in a terminal state.
    pub fn ensure_active(&self) -> Result<()> {
        if self.status.is_active() {
            Ok(())
        } else {
            Err(Error::NotActive {
                state: self.status.name(),
            })
        }
    }

    /// Read the value set for `key`: overlay first, then the base snapshot.
    ///
    /// Records `key` in the read set unless the universe marker is already
    /// set. A local tombstone answers `None`; after a local clear, keys
    /// absent from the overlay answer `None` without consulting the base.
    pub fn read(&mut self, key: &K) -> Result<Option<Arc<ValueSet<V>>>> {
        self.ensure_active()?;
        self.read_set.record(key.clone());
        if let Some(pending) = self.overlay.get(key) {
            return Ok(match pending {
                Pending::Put(values) => Some(Arc::clone(values)),
                Pending::Tombstone => None,
            });
        }
        if self.cleared {
            return Ok(None);
        }
        Ok(self.base.get(key).map(Arc::clone))
    }

    /// Insert or replace the value set for `key` in the overlay.
    ///
    /// Read-your-own-write is answered from the overlay; the read set is
    /// not touched.
    pub fn write(&mut self, key: K, values: ValueSet<V>) -> Result<()> {
        self.ensure_active()?;
        self.overlay.insert(key, Pending::Put(Arc::new(values)));
        Ok(())
    }

    /// Record a local tombstone for `key`.
    ///
    /// Removing an absent key still registers the tombstone; the write-set
    /// entry is deliberate and pinned by tests.
    pub fn remove(&mut self, key: K) -> Result<()> {
        self.ensure_active()?;
        self.overlay.insert(key, Pending::Tombstone);
        Ok(())
    }

    /// Mark the entire key universe as observed.
    ///
    /// No-op after a local `clear()`: the transaction already holds
    /// complete, self-consistent knowledge of the universe.
    pub fn mark_universe_read(&mut self) -> Result<()> {
        self.ensure_active()?;
        if !self.cleared {
            self.read_set = ReadSet::All;
        }
        Ok(())
    }

    /// Reset the overlay to "entire universe empty".
    ///
    /// Recorded as a universe write for conflict purposes against other
    /// transactions. The read set keeps everything recorded before the
    /// clear; only *subsequent* universe queries stop depending on
    /// concurrent state.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.overlay.clear();
        self.cleared = true;
        Ok(())
    }

    /// True if committing this transaction would publish anything.
    pub fn has_writes(&self) -> bool {
        self.cleared || !self.overlay.is_empty()
    }

    /// The key footprint this transaction would publish.
    pub fn write_summary(&self) -> WrittenKeys<K> {
        if self.cleared {
            WrittenKeys::All
        } else {
            WrittenKeys::Keys(self.overlay.keys().cloned().collect())
        }
    }

    /// Drain the overlay into (cleared, writes, deletes) for publication.
    pub fn take_writes(&mut self) -> (bool, Vec<(K, Arc<ValueSet<V>>)>, Vec<K>) {
        let mut writes = Vec::new();
        let mut deletes = Vec::new();
        for (key, pending) in self.overlay.drain() {
            match pending {
                Pending::Put(values) => writes.push((key, values)),
                Pending::Tombstone => deletes.push(key),
            }
        }
        (self.cleared, writes, deletes)
    }

    /// Number of keys visible to this transaction (base merged with the
    /// overlay). Callers mark the universe read first where required.
    pub fn merged_key_count(&self) -> usize {
        let mut count = if self.cleared { 0 } else { self.base.len() };
        for (key, pending) in &self.overlay {
            let in_base = !self.cleared && self.base.contains_key(key);
            match pending {
                Pending::Put(_) if !in_base => count += 1,
                Pending::Tombstone if in_base => count -= 1,
                _ => {}
            }
        }
        count
    }

    /// Materialize the keys visible to this transaction.
    pub fn merged_keys(&self) -> Vec<K> {
        let mut keys = Vec::new();
        if !self.cleared {
            for key in self.base.keys() {
                if !matches!(self.overlay.get(key), Some(Pending::Tombstone)) {
                    keys.push(key.clone());
                }
            }
        }
        for (key, pending) in &self.overlay {
            if matches!(pending, Pending::Put(_))
                && (self.cleared || !self.base.contains_key(key))
            {
                keys.push(key.clone());
            }
        }
        keys
    }

    /// Transition to `Committed`. The overlay is void afterwards.
    pub fn mark_committed(&mut self) {
        debug_assert!(self.status.is_active());
        self.overlay.clear();
        self.status = TransactionStatus::Committed;
    }

    /// Transition to `Aborted`, discarding the overlay. Side-effect-free on
    /// the store; never blocks.
    pub fn mark_aborted(&mut self, reason: impl Into<String>) {
        debug_assert!(self.status.is_active());
        self.overlay.clear();
        self.status = TransactionStatus::Aborted {
            reason: reason.into(),
        };
    }
}
