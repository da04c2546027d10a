//! # Buckets
//!
//! Named buckets with prefix and range scans on top of an embedded,
//! single-writer/multi-reader B+tree store ([redb](https://docs.rs/redb)).
//!
//! The store does the hard parts: pages, the B+tree, MVCC, durability.
//! This crate streamlines the common cases: single puts, gets and deletes,
//! batch inserts, and reading subsets of a bucket by key prefix or key range.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use buckets::{Database, Scanner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("./buckets.redb")?;
//!     let years = db.new_bucket("years")?;
//!
//!     years.put(b"1990", b"90")?;
//!     years.put(b"1995", b"95")?;
//!     years.put(b"2005", b"05")?;
//!
//!     // Keys between 1990 and 2000, both inclusive
//!     let nineties = years.range_scanner(b"1990", b"2000");
//!     assert_eq!(nineties.count()?, 2);
//!
//!     db.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions
//!
//! Every method opens exactly one transaction: read-only for reads and scans,
//! read-write for writes. Results are copied out before the transaction ends.
//! Batch writes ([`Bucket::insert`], [`Bucket::insert_if_absent`]) commit all
//! items together. Scanners hold no cursor between calls; each call re-walks
//! the bucket.
//!
//! ## Key order
//!
//! Keys sort byte by byte. Range bounds are compared the same way, so
//! numeric keys should be fixed width (`b"0042"`, not `b"42"`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bucket;
pub mod config;
mod db;
pub mod logging;
mod scanner;

pub use bucket::Bucket;
pub use config::Options;
pub use db::Database;
pub use scanner::{PrefixScanner, RangeScanner, Scanner};

// Re-export core types
pub use buckets_core::validate::{MAX_KEY_SIZE, MAX_VALUE_SIZE};
pub use buckets_core::{Error, Item, KeyRange, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
