//! Row-oriented tables over typed columns.
//!
//! A [`Table<R>`] owns one column per field of its row type `R`. All
//! columns always hold the same number of elements: structural changes are
//! applied to every column before any value is written.
//!
//! # Generation
//!
//! Every table carries a generation counter that starts at 0 and grows by
//! one on each insert, remove, clear or single-row write. Enumerations
//! capture it and fail with `ConcurrentModification` if it moves.

mod iter;

use std::any::type_name;
use std::cell::RefCell;
use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

use tabula_common::config::TableConfig;
use tabula_common::constants::capacity_for;
use tabula_common::error::{TabulaError, TabulaResult};
use tracing::debug;

use crate::column::{AnyColumn, Column, Element};
use crate::row::{resolve_column_names, Row};

pub use iter::{RowCursor, Rows};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

/// An in-memory table of rows of type `R`, stored column by column.
///
/// # Example
///
/// ```rust
/// use tabula_frame::Table;
///
/// let mut table = Table::<(u32, String)>::with_column_names(["id"]).unwrap();
/// table.push((1, "one".to_string())).unwrap();
/// table.push((3, "three".to_string())).unwrap();
/// table.insert(1, (2, "two".to_string())).unwrap();
///
/// assert_eq!(table.column_names().to_vec(), ["id", "Column 2"]);
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.get(1).unwrap(), (2, "two".to_string()));
///
/// let ids: Vec<u32> = table.rows().map(|row| row.unwrap().0).collect();
/// assert_eq!(ids, vec![1, 2, 3]);
/// ```
pub struct Table<R: Row> {
    /// Process-unique id, checked by detached cursors.
    id: u64,
    /// One column per row field, in field order.
    columns: Vec<Box<dyn AnyColumn>>,
    /// Mutation counter checked by enumerations.
    generation: u64,
    /// Reusable row staging buffer for reads and writes.
    row_buffer: RefCell<Vec<R>>,
}

impl<R: Row> Table<R> {
    /// Creates an empty table with default column names.
    pub fn new() -> TabulaResult<Self> {
        Self::with_config(&TableConfig::default())
    }

    /// Creates an empty table with room for at least `capacity` rows.
    pub fn with_capacity(capacity: usize) -> TabulaResult<Self> {
        Self::with_config(&TableConfig::with_capacity(capacity))
    }

    /// Creates an empty table naming the leading columns.
    ///
    /// Columns without a supplied name keep their default name.
    pub fn with_column_names<I, S>(names: I) -> TabulaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(&TableConfig::default().with_column_names(names))
    }

    /// Creates an empty table from a configuration.
    ///
    /// Fails with `ShapeNotSupported` if `R` declares no columns or
    /// creates a column set that does not match its declared width.
    pub fn with_config(config: &TableConfig) -> TabulaResult<Self> {
        config.validate().map_err(TabulaError::invalid_config)?;

        if R::COLUMN_COUNT == 0 {
            return Err(TabulaError::shape_not_supported(
                type_name::<R>(),
                "row type declares no columns",
            ));
        }

        let names = resolve_column_names::<R>(&config.column_names)?;
        let columns = R::create_columns(config.initial_capacity, &names)?;
        if columns.len() != R::COLUMN_COUNT {
            return Err(TabulaError::shape_not_supported(
                type_name::<R>(),
                format!(
                    "declares {} columns but created {}",
                    R::COLUMN_COUNT,
                    columns.len()
                ),
            ));
        }
        if columns.iter().any(|column| !column.is_empty()) {
            return Err(TabulaError::shape_not_supported(
                type_name::<R>(),
                "created columns must be empty",
            ));
        }

        debug!(
            row_type = type_name::<R>(),
            columns = columns.len(),
            capacity = config.initial_capacity,
            "created table"
        );

        Ok(Self {
            id: next_table_id(),
            columns,
            generation: 0,
            row_buffer: RefCell::new(Vec::with_capacity(1)),
        })
    }

    /// Creates a table holding `rows` in order.
    ///
    /// The generation of the new table is 0.
    pub fn from_rows<I>(rows: I) -> TabulaResult<Self>
    where
        I: IntoIterator<Item = R>,
    {
        let mut rows: Vec<R> = rows.into_iter().collect();
        let mut table = Self::with_capacity(rows.len())?;
        Self::grow_columns(&mut table.columns, 0, rows.len())?;
        R::write_rows(&mut table.columns, 0, &mut rows)?;
        Ok(table)
    }

    /// Creates a table holding clones of `rows`.
    pub fn from_slice(rows: &[R]) -> TabulaResult<Self>
    where
        R: Clone,
    {
        Self::from_rows(rows.iter().cloned())
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Returns the column names in field order.
    pub fn column_names(&self) -> ColumnNames<'_> {
        ColumnNames {
            columns: &self.columns,
        }
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.len())
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Returns the row capacity shared by the columns.
    pub fn capacity(&self) -> usize {
        self.columns.first().map_or(0, |column| column.capacity())
    }

    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the type-erased column at `position`.
    pub fn column(&self, position: usize) -> TabulaResult<&dyn AnyColumn> {
        self.columns
            .get(position)
            .map(|column| &**column)
            .ok_or_else(|| TabulaError::index_out_of_range(position, self.columns.len()))
    }

    /// Returns the column at `position` typed as `Column<T>`.
    ///
    /// Fails with `TypeMismatch` if the column stores another type.
    pub fn typed_column<T: Element>(&self, position: usize) -> TabulaResult<&Column<T>> {
        self.column(position)?.downcast_ref::<T>()
    }

    // =========================================================================
    // Row Access
    // =========================================================================

    /// Returns the row at `index`.
    pub fn get(&self, index: usize) -> TabulaResult<R> {
        self.check_row(index)?;

        let mut buffer = self.row_buffer.borrow_mut();
        buffer.clear();
        R::read_rows(&self.columns, index, 1, &mut buffer)?;
        buffer
            .pop()
            .ok_or_else(|| TabulaError::index_out_of_range(index, self.row_count()))
    }

    /// Replaces the row at `index`.
    pub fn set(&mut self, index: usize, row: R) -> TabulaResult<()> {
        self.check_row(index)?;

        let buffer = self.row_buffer.get_mut();
        buffer.clear();
        buffer.push(row);
        let result = R::write_rows(&mut self.columns, index, buffer);
        buffer.clear();
        result?;

        self.generation += 1;
        Ok(())
    }

    /// Appends a row.
    pub fn push(&mut self, row: R) -> TabulaResult<()> {
        self.insert(self.row_count(), row)
    }

    /// Appends every row of `rows`.
    pub fn extend_rows<I>(&mut self, rows: I) -> TabulaResult<()>
    where
        I: IntoIterator<Item = R>,
    {
        self.insert_range(self.row_count(), rows)
    }

    /// Inserts a row at `at`, shifting later rows down.
    pub fn insert(&mut self, at: usize, row: R) -> TabulaResult<()> {
        self.insert_range(at, std::iter::once(row))
    }

    /// Inserts `rows` at `at`, in order.
    ///
    /// Every column grows before any value is written.
    pub fn insert_range<I>(&mut self, at: usize, rows: I) -> TabulaResult<()>
    where
        I: IntoIterator<Item = R>,
    {
        let row_count = self.row_count();
        if at > row_count {
            return Err(TabulaError::index_out_of_range(at, row_count));
        }

        let buffer = self.row_buffer.get_mut();
        buffer.clear();
        buffer.extend(rows);
        let count = buffer.len();

        let grown = Self::grow_columns(&mut self.columns, at, count);
        if grown.is_ok() {
            self.generation += 1;
        }
        let result = grown.and_then(|()| R::write_rows(&mut self.columns, at, buffer));
        buffer.clear();
        result
    }

    /// Removes the row at `at`.
    pub fn remove_at(&mut self, at: usize) -> TabulaResult<()> {
        self.check_row(at)?;
        self.remove_range(at, 1)
    }

    /// Removes `count` rows starting at `at`.
    pub fn remove_range(&mut self, at: usize, count: usize) -> TabulaResult<()> {
        let row_count = self.row_count();
        match at.checked_add(count) {
            Some(end) if end <= row_count => {}
            _ => return Err(TabulaError::range_out_of_bounds(at, count, row_count)),
        }

        for column in &mut self.columns {
            column.shrink(at, count)?;
        }
        self.generation += 1;
        Ok(())
    }

    /// Removes every row. Column capacity is kept.
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.generation += 1;
    }

    fn check_row(&self, index: usize) -> TabulaResult<()> {
        let row_count = self.row_count();
        if index >= row_count {
            return Err(TabulaError::index_out_of_range(index, row_count));
        }
        Ok(())
    }

    /// Opens `count` rows at `at` in every column.
    ///
    /// The capacity check runs first so that no column grows unless all can.
    fn grow_columns(
        columns: &mut [Box<dyn AnyColumn>],
        at: usize,
        count: usize,
    ) -> TabulaResult<()> {
        let row_count = columns.first().map_or(0, |column| column.len());
        let required = row_count
            .checked_add(count)
            .ok_or(TabulaError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        capacity_for(required).ok_or(TabulaError::CapacityOverflow {
            requested: required,
        })?;

        for column in columns {
            column.expand(at, count)?;
        }
        Ok(())
    }
}

impl<R: Row> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            id: next_table_id(),
            columns: self.columns.iter().map(|column| column.boxed_copy()).collect(),
            generation: self.generation,
            row_buffer: RefCell::new(Vec::with_capacity(1)),
        }
    }
}

impl<R: Row> std::fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("row_type", &type_name::<R>())
            .field("columns", &self.column_names().to_vec())
            .field("row_count", &self.row_count())
            .field("generation", &self.generation)
            .finish()
    }
}

/// Ordered view of a table's column names.
#[derive(Clone, Copy)]
pub struct ColumnNames<'a> {
    columns: &'a [Box<dyn AnyColumn>],
}

impl<'a> ColumnNames<'a> {
    /// Returns the number of names.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no names.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the name of the column at `position`.
    pub fn get(&self, position: usize) -> Option<&'a str> {
        self.columns.get(position).map(|column| column.name())
    }

    /// Returns the position of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.iter().position(|candidate| candidate == name)
    }

    /// Iterates the names in column order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        let columns = self.columns;
        columns.iter().map(|column| column.name())
    }

    /// Copies the names into a vector.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

impl Index<usize> for ColumnNames<'_> {
    type Output = str;

    fn index(&self, position: usize) -> &str {
        self.columns[position].name()
    }
}

impl std::fmt::Debug for ColumnNames<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Row-type-independent view of a table.
///
/// Lets tables of different row types be handled through one
/// `dyn Frame`.
pub trait Frame {
    /// Returns the column names in field order.
    fn column_names(&self) -> ColumnNames<'_>;

    /// Returns the number of columns.
    fn column_count(&self) -> usize;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns true if there are no rows.
    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Returns the current generation.
    fn generation(&self) -> u64;

    /// Returns the type-erased column at `position`.
    fn column(&self, position: usize) -> TabulaResult<&dyn AnyColumn>;

    /// Returns the name of the row type.
    fn row_type(&self) -> &'static str;
}

impl<R: Row> Frame for Table<R> {
    fn column_names(&self) -> ColumnNames<'_> {
        Table::column_names(self)
    }

    fn column_count(&self) -> usize {
        Table::column_count(self)
    }

    fn row_count(&self) -> usize {
        Table::row_count(self)
    }

    fn generation(&self) -> u64 {
        Table::generation(self)
    }

    fn column(&self, position: usize) -> TabulaResult<&dyn AnyColumn> {
        Table::column(self, position)
    }

    fn row_type(&self) -> &'static str {
        type_name::<R>()
    }
}
