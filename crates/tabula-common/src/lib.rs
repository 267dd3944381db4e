//! # tabula-common
//!
//! Errors, configuration, constants, and scratch memory shared by the
//! tabula crates.
//!
//! - **Errors**: Unified error handling with `TabulaError` and stable `ErrorCode`s
//! - **Config**: Table construction and scratch pool settings
//! - **Constants**: Capacity rules and default column naming
//! - **Memory**: Pooled scratch buffers for bulk row marshalling
//!
//! ## Example
//!
//! ```rust
//! use tabula_common::{capacity_for, TableConfig, TabulaResult};
//!
//! fn example() -> TabulaResult<()> {
//!     let config = TableConfig::with_capacity(300).with_column_names(["id", "score"]);
//!     assert_eq!(capacity_for(config.initial_capacity), Some(512));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod memory;

// Re-export commonly used items at the crate root
pub use config::{ScratchPoolConfig, TableConfig};
pub use constants::*;
pub use error::{ErrorCode, TabulaError, TabulaResult};
pub use memory::{PoolStats, ScratchBuffer, ScratchPool};
