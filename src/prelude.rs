//! Convenient imports for Weft.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```ignore
//! use weft::prelude::*;
//!
//! let engine: Weft<String, i64> = Weft::new();
//! engine.execute(|map| map.insert("k".to_string(), 1).map(|_| ()))?;
//! ```

// Main entry point
pub use crate::engine::{Transaction, Weft};

// Error handling
pub use crate::error::{Error, Result};

// Facade views
pub use crate::multimap::{KeySetView, ReadView, TransactionalMultimap};

// Core types
pub use crate::{TransactionStatus, ValueSet, Version};
