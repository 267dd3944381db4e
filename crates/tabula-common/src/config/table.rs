//! Table and scratch pool configuration structures.

use serde::{Deserialize, Serialize};

use crate::constants::{
    capacity_for, DEFAULT_INITIAL_CAPACITY, DEFAULT_SCRATCH_BUFFERS_PER_TYPE,
    DEFAULT_SCRATCH_MAX_RETAINED_CAPACITY,
};

/// Construction options for a table.
///
/// # Example
///
/// ```rust
/// use tabula_common::config::TableConfig;
///
/// let config = TableConfig::with_capacity(1000).with_column_names(["x", "y"]);
/// assert_eq!(config.initial_capacity, 1000);
/// assert_eq!(config.column_names, vec!["x", "y"]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Capacity hint applied to every column.
    /// Rounded up to a power of two, at least 256.
    /// Default: 256
    pub initial_capacity: usize,

    /// Leading column names. Positions without a name fall back to the
    /// row type's defaults ("Column {n}" for tuples).
    /// Default: empty
    pub column_names: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            column_names: Vec::new(),
        }
    }
}

impl TableConfig {
    /// Creates a configuration with the given capacity hint.
    #[must_use]
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Default::default()
        }
    }

    /// Sets the leading column names.
    #[must_use]
    pub fn with_column_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if capacity_for(self.initial_capacity).is_none() {
            return Err(format!(
                "initial_capacity {} cannot be rounded to a power of two",
                self.initial_capacity
            ));
        }

        Ok(())
    }
}

/// Retention limits of a scratch-buffer pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchPoolConfig {
    /// Idle buffers kept per element type.
    /// Default: 16
    pub max_buffers_per_type: usize,

    /// Largest capacity (in elements) of a buffer kept for reuse.
    /// Larger buffers are freed on release.
    /// Default: 65536
    pub max_retained_capacity: usize,
}

impl Default for ScratchPoolConfig {
    fn default() -> Self {
        Self {
            max_buffers_per_type: DEFAULT_SCRATCH_BUFFERS_PER_TYPE,
            max_retained_capacity: DEFAULT_SCRATCH_MAX_RETAINED_CAPACITY,
        }
    }
}

impl ScratchPoolConfig {
    /// Sets the number of idle buffers kept per element type.
    #[must_use]
    pub fn with_max_buffers_per_type(mut self, count: usize) -> Self {
        self.max_buffers_per_type = count;
        self
    }

    /// Sets the largest retained buffer capacity.
    #[must_use]
    pub fn with_max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_buffers_per_type == 0 {
            return Err("max_buffers_per_type must be greater than 0".to_string());
        }

        if self.max_retained_capacity == 0 {
            return Err("max_retained_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
