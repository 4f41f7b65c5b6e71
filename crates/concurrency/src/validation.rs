//! Commit-time conflict validation
//!
//! First-committer-wins: a committing transaction is checked against every
//! commit that published after its base version. Only the *read* set matters
//! for correctness here; two transactions writing disjoint data never
//! invalidate each other, and writes to keys the committer also wrote but
//! never read are last-writer-wins by design.

use crate::transaction::ReadSet;
use std::hash::Hash;
use weft_core::{Version, WrittenKeys};
use weft_storage::CommitRecord;

/// Why a transaction failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// The transaction observed the whole universe and something committed.
    UniverseRead {
        /// Version of the conflicting commit.
        commit_version: Version,
    },
    /// A concurrent commit rewrote the universe (a clear) under a reader.
    UniverseWrite {
        /// Version of the conflicting commit.
        commit_version: Version,
    },
    /// A concurrent commit wrote a key this transaction read.
    KeyOverlap {
        /// Version of the conflicting commit.
        commit_version: Version,
    },
}

/// Outcome of validating one transaction against the commit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// No intervening commit invalidates the transaction's reads.
    Valid,
    /// The first conflict found, in commit order.
    Conflict(ConflictKind),
}

impl ValidationResult {
    /// True if the transaction may commit.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Validate a transaction's read set against commits newer than its base.
///
/// `history` must be ascending by version and contain exactly the records
/// with version strictly greater than the transaction's base. A transaction
/// that read nothing is vacuously valid regardless of what committed.
pub fn validate_transaction<K: Eq + Hash>(
    read_set: &ReadSet<K>,
    history: &[CommitRecord<K>],
) -> ValidationResult {
    for record in history {
        match (read_set, &record.writes) {
            (ReadSet::All, _) => {
                return ValidationResult::Conflict(ConflictKind::UniverseRead {
                    commit_version: record.version,
                });
            }
            (ReadSet::Keys(keys), WrittenKeys::All) => {
                if !keys.is_empty() {
                    return ValidationResult::Conflict(ConflictKind::UniverseWrite {
                        commit_version: record.version,
                    });
                }
            }
            (ReadSet::Keys(keys), WrittenKeys::Keys(written)) => {
                if keys.iter().any(|key| written.contains(key)) {
                    return ValidationResult::Conflict(ConflictKind::KeyOverlap {
                        commit_version: record.version,
                    });
                }
            }
        }
    }
    ValidationResult::Valid
}
