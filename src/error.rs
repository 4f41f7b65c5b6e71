//! Unified error types for Weft.
//!
//! This module wraps the internal engine errors and presents a small,
//! stable surface to users.

use thiserror::Error;

/// All Weft errors.
///
/// This is the canonical error type for all engine operations. Conflicts
/// are the expected steady-state failure under contention; everything else
/// indicates caller misuse or a bug.
#[derive(Debug, Error)]
pub enum Error {
    /// Commit validation failed against a concurrent commit.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Operation on a committed or aborted transaction.
    #[error("transaction not active (state: {0})")]
    TransactionNotActive(&'static str),

    /// Internal error (bug or invariant violation).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Weft operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is retryable.
    ///
    /// A conflict may succeed on retry against a fresh snapshot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}

// Convert from internal engine errors
impl From<weft_core::Error> for Error {
    fn from(e: weft_core::Error) -> Self {
        use weft_core::Error as CoreError;
        match e {
            CoreError::Conflict { reason } => Error::Conflict(reason),
            CoreError::NotActive { state } => Error::TransactionNotActive(state),
            CoreError::Internal(msg) => Error::Internal(msg),
        }
    }
}
