//! System-wide constants for tabula.
//!
//! This module defines constants used across the tabula crates.

// =============================================================================
// Column Constants
// =============================================================================

/// Smallest backing capacity of a column, in elements.
///
/// Every capacity is a power of two no smaller than this.
pub const MIN_COLUMN_CAPACITY: usize = 256;

/// Capacity hint used when a table is created without one.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Prefix of generated column names ("Column 1", "Column 2", ...).
pub const DEFAULT_COLUMN_NAME_PREFIX: &str = "Column";

// =============================================================================
// Row Shape Constants
// =============================================================================

/// Number of tuple fields mapped directly to columns.
///
/// Wider tuples are split into a head of this many fields and a tail
/// tuple handled recursively.
pub const DIRECT_ROW_WIDTH: usize = 7;

/// Widest tuple with a built-in row mapping.
pub const MAX_TUPLE_WIDTH: usize = 16;

// =============================================================================
// Scratch Pool Constants
// =============================================================================

/// Buffers kept per element type by a scratch pool.
pub const DEFAULT_SCRATCH_BUFFERS_PER_TYPE: usize = 16;

/// Largest buffer capacity (in elements) a scratch pool keeps for reuse.
pub const DEFAULT_SCRATCH_MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Rounds a requested element count up to a column capacity.
///
/// Returns `None` when the rounded value is not representable.
///
/// # Example
///
/// ```rust
/// use tabula_common::constants::capacity_for;
///
/// assert_eq!(capacity_for(1), Some(256));
/// assert_eq!(capacity_for(257), Some(512));
/// ```
#[inline]
#[must_use]
pub const fn capacity_for(requested: usize) -> Option<usize> {
    let requested = if requested < MIN_COLUMN_CAPACITY {
        MIN_COLUMN_CAPACITY
    } else {
        requested
    };
    requested.checked_next_power_of_two()
}
