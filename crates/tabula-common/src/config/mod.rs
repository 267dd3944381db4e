//! Configuration for tabula.
//!
//! This module provides configuration structures for tables and the
//! scratch-buffer pool.

mod table;

pub use table::{ScratchPoolConfig, TableConfig};
