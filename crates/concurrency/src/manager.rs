//! Commit coordination
//!
//! The `TransactionManager` owns the single commit critical section. Begin
//! and reads are lock-free with respect to it; only the
//! validate-then-publish sequence serializes here, so the window one commit
//! blocks another is the conflict check plus one map merge.

use crate::transaction::TransactionContext;
use crate::validation::{validate_transaction, ConflictKind, ValidationResult};
use parking_lot::Mutex;
use std::hash::Hash;
use weft_core::{Error, Result, Version};
use weft_storage::VersionedStore;

/// Serializes commits and drives validation.
///
/// Stateless apart from the lock: all durable state lives in the store, all
/// per-transaction state in the context.
#[derive(Debug, Default)]
pub struct TransactionManager {
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    /// Create a new manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to commit `ctx` against `store`.
    ///
    /// Holds the commit critical section across validation and publication,
    /// so the history cannot grow between the check and the merge. On
    /// conflict the context is marked aborted and `Error::Conflict` is
    /// returned; the store is untouched either way until validation passes.
    ///
    /// A transaction with no writes still validates (its reads must hold at
    /// commit time) but publishes nothing and returns its base version.
    pub fn commit<K, V>(
        &self,
        ctx: &mut TransactionContext<K, V>,
        store: &VersionedStore<K, V>,
    ) -> Result<Version>
    where
        K: Eq + Hash + Clone,
        V: Eq + Hash + Clone,
    {
        ctx.ensure_active()?;

        let _guard = self.commit_lock.lock();

        let base = ctx.base_version();
        let history = store.records_since(base);
        if let ValidationResult::Conflict(kind) = validate_transaction(ctx.read_set(), &history) {
            let reason = describe_conflict(&kind);
            tracing::debug!(base, reason, "transaction failed validation");
            ctx.mark_aborted(reason);
            return Err(Error::Conflict {
                reason: reason.to_string(),
            });
        }

        if !ctx.has_writes() {
            ctx.mark_committed();
            return Ok(base);
        }

        let (cleared, writes, deletes) = ctx.take_writes();
        let version = store.publish(cleared, writes, deletes);
        ctx.mark_committed();
        tracing::debug!(base, version, cleared, "transaction committed");
        Ok(version)
    }

    /// Abort `ctx`, discarding its overlay.
    ///
    /// Never blocks and never touches the store.
    pub fn abort<K, V>(&self, ctx: &mut TransactionContext<K, V>, reason: impl Into<String>)
    where
        K: Eq + Hash + Clone,
        V: Eq + Hash + Clone,
    {
        if ctx.status().is_active() {
            ctx.mark_aborted(reason);
        }
    }
}

fn describe_conflict(kind: &ConflictKind) -> &'static str {
    match kind {
        ConflictKind::UniverseRead { .. } => "universe read invalidated by concurrent commit",
        ConflictKind::UniverseWrite { .. } => "key read invalidated by concurrent clear",
        ConflictKind::KeyOverlap { .. } => "key read invalidated by concurrent write",
    }
}
