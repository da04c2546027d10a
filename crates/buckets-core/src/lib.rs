//! # Buckets Core
//!
//! Core types shared by the `buckets` crate.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of buckets.**
//!
//! Users should depend on the main `buckets` crate instead, which re-exports
//! everything needed from here.
//!
//! ---
//!
//! - [`Error`] / [`Result`]: the error taxonomy for every operation
//! - [`Item`]: owned key/value pairs
//! - [`KeyRange`]: the stopping rule for prefix and range scans
//! - [`validate`]: write-side input checks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod item;
pub mod scan;
pub mod validate;

pub use error::{Error, Result};
pub use item::Item;
pub use scan::KeyRange;
