//! Fundamental types for the weft engine
//!
//! This module defines the shapes shared by every layer:
//! - [`Version`]: the global commit counter
//! - [`ValueSet`] and [`Mapping`]: the multimap representation
//! - [`WrittenKeys`]: the key footprint of a committed or pending write-set

use rustc_hash::FxHashSet;
use std::collections::HashSet;
use std::sync::Arc;

/// Global commit version.
///
/// Strictly increases on every publishing commit. A transaction's base
/// version fixes its read time for its entire lifetime.
pub type Version = u64;

/// The set of values mapped to a single key.
///
/// Value sets are non-empty by construction: inserting adds a value,
/// removing deletes the whole key. An absent key is represented by
/// `Option::None`, never by an empty set.
pub type ValueSet<V> = HashSet<V>;

/// The multimap shape: key to shared value-set.
///
/// Value sets are behind `Arc` so a snapshot and the live mapping share
/// them structurally; publishing a commit clones the outer map only.
pub type Mapping<K, V> = rustc_hash::FxHashMap<K, Arc<ValueSet<V>>>;

/// The key footprint of a write-set.
///
/// `All` means the write touches the entire key universe (produced by a
/// transactional `clear()`); validation treats it as modifying every key
/// without materializing the key set.
#[derive(Debug, Clone)]
pub enum WrittenKeys<K> {
    /// Specific keys were written.
    Keys(FxHashSet<K>),
    /// The whole universe was written (a clear).
    All,
}

impl<K: Eq + std::hash::Hash> WrittenKeys<K> {
    /// True if this footprint modifies nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            WrittenKeys::Keys(keys) => keys.is_empty(),
            WrittenKeys::All => false,
        }
    }

    /// True if this footprint covers the given key.
    pub fn contains(&self, key: &K) -> bool {
        match self {
            WrittenKeys::Keys(keys) => keys.contains(key),
            WrittenKeys::All => true,
        }
    }

    /// True if this footprint covers the whole universe.
    pub fn is_all(&self) -> bool {
        matches!(self, WrittenKeys::All)
    }
}
