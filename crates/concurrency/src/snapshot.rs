//! Immutable snapshot views
//!
//! A snapshot fixes a transaction's read time: it pairs the store's version
//! at acquisition with the mapping published by that version. Reads against
//! it never block and never observe later commits.

use std::hash::Hash;
use std::sync::Arc;
use weft_core::{Mapping, ValueSet, Version};

/// An immutable view of the store at a specific version.
///
/// Cheap to clone (two words); may be shared by many transactions.
#[derive(Debug, Clone)]
pub struct Snapshot<K, V> {
    version: Version,
    view: Arc<Mapping<K, V>>,
}

impl<K, V> Snapshot<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// Create a snapshot from a consistent (version, mapping) pair.
    pub fn new(version: Version, view: Arc<Mapping<K, V>>) -> Self {
        Self { version, view }
    }

    /// The version this snapshot was taken at.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Look up the value set mapped to `key` as of this snapshot.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&Arc<ValueSet<V>>> {
        self.view.get(key)
    }

    /// True if `key` has a mapping as of this snapshot.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.view.contains_key(key)
    }

    /// Number of keys as of this snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// True if the snapshot holds no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Iterate the keys as of this snapshot.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.view.keys()
    }
}
