//! Core types for the weft STM engine
//!
//! This crate defines the fundamental vocabulary shared by the storage and
//! concurrency layers:
//! - [`Version`]: monotonically increasing commit version
//! - [`ValueSet`] / [`Mapping`]: the multimap shape
//! - [`WrittenKeys`]: a commit's key footprint, including the universe marker
//! - [`Error`]: the internal error enum

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Mapping, ValueSet, Version, WrittenKeys};
