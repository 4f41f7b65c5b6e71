//! Concurrency layer for weft
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: read/write-set tracking with a private overlay
//! - Snapshot isolation via immutable mapping snapshots
//! - Conflict detection at commit time against the commit history
//! - TransactionManager: the single commit critical section

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod snapshot;
pub mod transaction;
pub mod validation;

pub use manager::TransactionManager;
pub use snapshot::Snapshot;
pub use transaction::{Pending, ReadSet, TransactionContext, TransactionStatus};
pub use validation::{validate_transaction, ConflictKind, ValidationResult};
