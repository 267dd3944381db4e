//! Tabula Performance Benchmarks
//!
//! This crate contains benchmarks for the tabula components:
//! - Growable columns (append, mid-column insert, removal)
//! - Tables (row reads, bulk inserts, enumeration) for narrow and wide rows
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p tabula-bench
//! ```

pub mod utils;
