//! # Weft
//!
//! Software transactional memory over a shared in-memory multimap.
//!
//! Weft gives many threads atomic, isolated access to one key → value-set
//! structure using optimistic concurrency control: transactions run against
//! an immutable snapshot, buffer their writes privately, and validate their
//! reads at commit time. The first committer wins; a losing transaction is
//! rejected with a retryable conflict and left without side effects.
//!
//! ## Quick Start
//!
//! ```ignore
//! use weft::prelude::*;
//!
//! let engine: Weft<String, i64> = Weft::new();
//!
//! // Closure form: commits on Ok, aborts on Err.
//! engine.execute(|map| {
//!     map.insert("scores".to_string(), 42)?;
//!     Ok(())
//! })?;
//!
//! // Handle form, with the caller owning retry policy.
//! loop {
//!     let mut txn = engine.begin();
//!     txn.multimap().insert("scores".to_string(), 7)?;
//!     match txn.commit() {
//!         Ok(_) => break,
//!         Err(e) if e.is_retryable() => continue,
//!         Err(e) => return Err(e),
//!     }
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Snapshot isolation**: a transaction observes one committed version
//!   for its whole lifetime, plus its own uncommitted writes.
//! - **Atomicity**: a commit publishes all buffered writes or none.
//! - **Serializable commits**: validation rejects any transaction whose
//!   reads were invalidated by a concurrent commit.
//! - **Non-blocking reads**: snapshots are immutable; readers never wait
//!   on writers beyond a single `Arc` clone.

#![warn(missing_docs)]

mod engine;
mod error;
mod multimap;

pub mod prelude;

// Re-export main entry points
pub use engine::{Transaction, Weft};
pub use error::{Error, Result};

// Re-export facade views
pub use multimap::{KeySetView, ReadView, TransactionalMultimap};

// Re-export core vocabulary types
pub use weft_concurrency::TransactionStatus;
pub use weft_core::{Mapping, ValueSet, Version};
