//! Table and column error types.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Invalid configuration.
    InvalidConfig = 0x0001,

    // Range errors (0x0100 - 0x01FF)
    /// Index outside the logical length.
    IndexOutOfRange = 0x0100,
    /// Run of elements outside the logical length.
    RangeOutOfBounds = 0x0101,
    /// Requested capacity is not representable.
    CapacityOverflow = 0x0102,
    /// Slot was opened but never populated.
    VacantSlot = 0x0103,

    // Shape errors (0x0200 - 0x02FF)
    /// Row type cannot be decomposed into columns.
    ShapeNotSupported = 0x0200,
    /// Column element type differs from the requested one.
    TypeMismatch = 0x0201,

    // Iteration errors (0x0300 - 0x03FF)
    /// Table changed while being enumerated.
    ConcurrentModification = 0x0300,
    /// Cursor stepped against a table other than the one it started on.
    ForeignCursor = 0x0301,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Range",
            0x02 => "Shape",
            0x03 => "Iteration",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for tabula.
///
/// Every failure is detected locally and returned to the caller
/// immediately; nothing is retried.
///
/// # Example
///
/// ```rust
/// use tabula_common::error::{TabulaError, TabulaResult};
///
/// fn row_at(index: usize, len: usize) -> TabulaResult<usize> {
///     if index >= len {
///         return Err(TabulaError::index_out_of_range(index, len));
///     }
///     Ok(index)
/// }
///
/// assert!(row_at(3, 2).unwrap_err().is_range_error());
/// ```
#[derive(Debug, Error)]
pub enum TabulaError {
    // ==========================================================================
    // Range Errors
    // ==========================================================================
    /// Index outside `[0, len)`.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Logical length at the time of the call.
        len: usize,
    },

    /// Run `[start, start + count)` does not fit in `[0, len]`.
    #[error("range starting at {start} with {count} elements is out of bounds for length {len}")]
    RangeOutOfBounds {
        /// First index of the run.
        start: usize,
        /// Number of elements in the run.
        count: usize,
        /// Logical length at the time of the call.
        len: usize,
    },

    /// Capacity cannot be rounded to a representable power of two.
    #[error("capacity request {requested} cannot be satisfied")]
    CapacityOverflow {
        /// The requested element count.
        requested: usize,
    },

    /// A slot opened by an expand was read before being populated.
    #[error("slot {index} has not been populated")]
    VacantSlot {
        /// The vacant index.
        index: usize,
    },

    // ==========================================================================
    // Shape Errors
    // ==========================================================================
    /// Row type cannot be mapped onto a column set.
    #[error("row shape {shape} is not supported: {reason}")]
    ShapeNotSupported {
        /// Name of the row type.
        shape: String,
        /// Why the shape was rejected.
        reason: String,
    },

    /// Typed column view requested with the wrong element type.
    #[error("type mismatch on column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Requested element type.
        expected: String,
        /// Stored element type.
        actual: String,
    },

    // ==========================================================================
    // Iteration Errors
    // ==========================================================================
    /// Table generation changed between two enumeration steps.
    #[error("table was modified during enumeration (generation {expected} -> {actual})")]
    ConcurrentModification {
        /// Generation captured when enumeration started.
        expected: u64,
        /// Generation observed at the failing step.
        actual: u64,
    },

    /// Cursor used with a table other than the one it was started on.
    #[error("cursor started on table {cursor_table} was used with table {table}")]
    ForeignCursor {
        /// Id of the table the cursor was started on.
        cursor_table: u64,
        /// Id of the table passed to the failing step.
        table: u64,
    },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },
}

impl TabulaError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            Self::RangeOutOfBounds { .. } => ErrorCode::RangeOutOfBounds,
            Self::CapacityOverflow { .. } => ErrorCode::CapacityOverflow,
            Self::VacantSlot { .. } => ErrorCode::VacantSlot,
            Self::ShapeNotSupported { .. } => ErrorCode::ShapeNotSupported,
            Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::ConcurrentModification { .. } => ErrorCode::ConcurrentModification,
            Self::ForeignCursor { .. } => ErrorCode::ForeignCursor,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Returns true for index, run and capacity errors.
    #[must_use]
    pub const fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::RangeOutOfBounds { .. }
                | Self::CapacityOverflow { .. }
                | Self::VacantSlot { .. }
        )
    }

    /// Returns true if the table was mutated under an enumeration.
    #[must_use]
    pub const fn is_concurrent_modification(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Creates an index error.
    #[must_use]
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Creates a run error.
    #[must_use]
    pub const fn range_out_of_bounds(start: usize, count: usize, len: usize) -> Self {
        Self::RangeOutOfBounds { start, count, len }
    }

    /// Creates a shape error.
    #[must_use]
    pub fn shape_not_supported(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShapeNotSupported {
            shape: shape.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
