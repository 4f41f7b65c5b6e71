//! Versioned multimap store
//!
//! The `VersionedStore` is the only component in the engine holding globally
//! shared mutable state. It publishes the live mapping as an immutable
//! `Arc<Mapping>` so snapshot acquisition is one `Arc` clone under a read
//! lock; readers never block writers beyond that instant.
//!
//! # Publication protocol
//!
//! Publishing a commit clones the outer map (value sets are shared
//! structurally), applies the write-set, swaps the live `Arc`, and bumps the
//! version counter while still holding the write lock. A snapshot therefore
//! always observes a (version, mapping) pair produced by the same commit.
//!
//! # History retention
//!
//! Every publishing commit appends a `CommitRecord`. Records are retained
//! while any registered reader has a base version older than them and pruned
//! as readers finish; with no readers registered the history is empty.

use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, VecDeque};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use weft_core::{Mapping, ValueSet, Version, WrittenKeys};

/// History entry for one publishing commit.
#[derive(Debug, Clone)]
pub struct CommitRecord<K> {
    /// The version this commit published.
    pub version: Version,
    /// The keys this commit wrote (or the universe marker for a clear).
    pub writes: WrittenKeys<K>,
}

/// The authoritative multimap plus its version counter and commit history.
///
/// # Thread Safety
///
/// - `snapshot_parts()`: read lock held for one `Arc` clone
/// - `begin_snapshot()`: additionally holds the reader registry lock so
///   registration is atomic with snapshot acquisition
/// - `publish()`: must only be called by the commit coordinator while it
///   holds the commit critical section; the write lock here only fences
///   concurrent snapshot readers
/// - reader registry and history use their own short-lived mutexes
pub struct VersionedStore<K, V> {
    /// Live mapping, swapped wholesale on every publishing commit.
    live: RwLock<Arc<Mapping<K, V>>>,

    /// Global version counter. Bumped once per publishing commit, while the
    /// `live` write lock is held.
    version: AtomicU64,

    /// Commit history, ascending by version.
    history: Mutex<VecDeque<CommitRecord<K>>>,

    /// Refcounts of active transactions per base version.
    readers: Mutex<BTreeMap<Version, usize>>,
}

impl<K, V> VersionedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// Create an empty store at version 0.
    pub fn new() -> Self {
        Self {
            live: RwLock::new(Arc::new(Mapping::default())),
            version: AtomicU64::new(0),
            history: Mutex::new(VecDeque::new()),
            readers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Get the current committed version.
    #[inline]
    pub fn version(&self) -> Version {
        self.version.load(Ordering::Acquire)
    }

    /// Get a consistent (version, mapping) pair for a new snapshot.
    ///
    /// The mapping is immutable once handed out and may be shared by many
    /// transactions. Does NOT register a reader: use this for untracked
    /// views, and [`begin_snapshot`](Self::begin_snapshot) for transactions
    /// that will validate at commit time.
    pub fn snapshot_parts(&self) -> (Version, Arc<Mapping<K, V>>) {
        let guard = self.live.read();
        let version = self.version.load(Ordering::Acquire);
        (version, Arc::clone(&guard))
    }

    /// Take a snapshot and register its reader in one step.
    ///
    /// Registration happens while the `readers` lock is held across the
    /// read of the (version, mapping) pair, so no commit can publish and
    /// prune its record in the window between the snapshot being taken and
    /// the reader becoming visible to pruning. Callers must pair this with
    /// [`release_reader`](Self::release_reader) at the returned version.
    pub fn begin_snapshot(&self) -> (Version, Arc<Mapping<K, V>>) {
        let mut readers = self.readers.lock();
        let guard = self.live.read();
        let version = self.version.load(Ordering::Acquire);
        *readers.entry(version).or_insert(0) += 1;
        (version, Arc::clone(&guard))
    }

    /// Number of keys in the committed mapping.
    pub fn len(&self) -> usize {
        self.live.read().len()
    }

    /// True if the committed mapping has no keys.
    pub fn is_empty(&self) -> bool {
        self.live.read().is_empty()
    }

    /// Register an active transaction reading from `base`.
    ///
    /// Keeps commit records newer than `base` alive for validation.
    pub fn register_reader(&self, base: Version) {
        let mut readers = self.readers.lock();
        *readers.entry(base).or_insert(0) += 1;
    }

    /// Release a previously registered reader and prune unreachable history.
    pub fn release_reader(&self, base: Version) {
        let mut readers = self.readers.lock();
        match readers.get_mut(&base) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                readers.remove(&base);
            }
            None => debug_assert!(false, "release without matching register"),
        }
        let oldest = readers.keys().next().copied();
        drop(readers);
        self.prune_history(oldest);
    }

    /// Committed history with version strictly greater than `base`.
    pub fn records_since(&self, base: Version) -> Vec<CommitRecord<K>> {
        self.history
            .lock()
            .iter()
            .filter(|record| record.version > base)
            .cloned()
            .collect()
    }

    /// Number of retained commit records.
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    /// Merge a validated write-set into the live mapping and publish a new
    /// version.
    ///
    /// `cleared` starts the merge from an empty mapping (a transactional
    /// clear); `writes` replace value sets per key and `deletes` remove
    /// keys. Returns the new version.
    ///
    /// Must only be called while the commit coordinator holds the commit
    /// critical section.
    pub fn publish(
        &self,
        cleared: bool,
        writes: Vec<(K, Arc<ValueSet<V>>)>,
        deletes: Vec<K>,
    ) -> Version {
        let footprint = if cleared {
            WrittenKeys::All
        } else {
            let mut keys = rustc_hash::FxHashSet::default();
            keys.extend(writes.iter().map(|(key, _)| key.clone()));
            keys.extend(deletes.iter().cloned());
            WrittenKeys::Keys(keys)
        };

        let mut guard = self.live.write();
        let mut next: Mapping<K, V> = if cleared {
            Mapping::default()
        } else {
            (**guard).clone()
        };
        for (key, values) in writes {
            next.insert(key, values);
        }
        for key in &deletes {
            next.remove(key);
        }
        *guard = Arc::new(next);
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        drop(guard);

        self.history
            .lock()
            .push_back(CommitRecord { version, writes: footprint });

        let oldest = self.readers.lock().keys().next().copied();
        self.prune_history(oldest);

        version
    }

    /// Drop commit records no active transaction can reference.
    ///
    /// `oldest_reader` is the minimum registered base version, or `None`
    /// when no transaction is active (everything is prunable).
    fn prune_history(&self, oldest_reader: Option<Version>) {
        let mut history = self.history.lock();
        let before = history.len();
        match oldest_reader {
            Some(base) => {
                while history.front().is_some_and(|record| record.version <= base) {
                    history.pop_front();
                }
            }
            None => history.clear(),
        }
        let pruned = before - history.len();
        if pruned > 0 {
            tracing::trace!(pruned, retained = history.len(), "pruned commit history");
        }
    }
}

impl<K, V> Default for VersionedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
