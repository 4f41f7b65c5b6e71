//! STM Comprehensive Test Suite
//!
//! End-to-end coverage of the transactional multimap engine:
//!
//! - snapshot isolation and atomic publication
//! - commit-time conflict validation (first committer wins)
//! - map facade semantics, including universe-read tracking
//! - read-only and key-set views
//! - multithreaded stress under contention
//! - property-based serializability checks
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test stm_comprehensive
//!
//! # Run the conflict tests only
//! cargo test --test stm_comprehensive conflicts::
//! ```

use weft::prelude::*;

// Test modules
pub mod concurrency;
pub mod multimap;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Create an engine preloaded with (key, values) entries, committed as one
/// transaction.
pub fn engine_with(entries: &[(&str, &[i64])]) -> Weft<String, i64> {
    let engine = Weft::new();
    if !entries.is_empty() {
        engine
            .execute(|map| {
                for (key, values) in entries {
                    for value in *values {
                        map.insert(key.to_string(), *value)?;
                    }
                }
                Ok(())
            })
            .unwrap();
    }
    engine
}
