//! Storage layer for weft
//!
//! This crate implements the single authoritative multimap state:
//! - VersionedStore: live mapping behind an immutable-snapshot publication
//!   protocol, with an AtomicU64 version counter
//! - CommitRecord history for commit-time validation
//! - Active-reader registry driving history pruning

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{CommitRecord, VersionedStore};
