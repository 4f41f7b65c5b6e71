//! Internal error types for the weft engine
//!
//! The facade crate wraps these in its public `Error`; engine-internal code
//! works in terms of this enum.

use thiserror::Error;

/// Errors raised by the transaction engine.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Commit validation failed: another transaction committed a write that
    /// this transaction observed. Recoverable by retrying from a fresh
    /// snapshot; the engine never retries on its own.
    #[error("transaction conflict: {reason}")]
    Conflict {
        /// Human-readable description of the violating commit.
        reason: String,
    },

    /// An operation was attempted on a transaction that has already been
    /// committed or aborted. Both states are terminal.
    #[error("transaction not active ({state})")]
    NotActive {
        /// The terminal state the transaction is in.
        state: &'static str,
    },

    /// Bug or invariant violation inside the engine.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for engine-internal operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a commit-time conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}
