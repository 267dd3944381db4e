//! Error handling for tabula.
//!
//! This module provides a unified error type and result alias used
//! across all tabula components.

mod table;

pub use table::{ErrorCode, TabulaError};

/// Result type alias for tabula operations.
pub type TabulaResult<T> = std::result::Result<T, TabulaError>;
