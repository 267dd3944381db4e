//! # tabula-test
//!
//! Integration tests for tabula.
//!
//! This crate contains:
//! - Shared test helpers (tracing setup, table assertions)
//! - Seeded workload generators with a `Vec` reference model
//! - The integration test suite under `tests/`

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Test utilities and helpers
pub mod utils;

/// Workload generators
pub mod workload;
