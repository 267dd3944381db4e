//! Row shapes and their mapping onto column sets.
//!
//! A row type implements [`Row`] to describe how many columns it needs,
//! what they are called by default, and how a contiguous run of rows is
//! gathered from or scattered into those columns.
//!
//! Two families are supported:
//!
//! - **Records**: user types implement [`Row`] by hand and name their own
//!   columns.
//! - **Tuples**: every tuple of 1 to 16 [`Element`] fields implements
//!   [`Row`]. Field `k` maps to column `k`. Tuples wider than
//!   `DIRECT_ROW_WIDTH` are split into a 7-field head and a tail tuple that
//!   is mapped recursively.
//!
//! Other shapes have no `Row` implementation and are rejected when the
//! program is compiled.

mod tuple;

use std::any::type_name;
use std::slice;

use tabula_common::constants::DEFAULT_COLUMN_NAME_PREFIX;
use tabula_common::error::{TabulaError, TabulaResult};

use crate::column::{AnyColumn, Column, Element};

/// Mapping between a row shape and a column set.
///
/// Implementations must be stateless: everything they need comes from the
/// columns they are handed.
///
/// # Implementing for a record
///
/// ```rust
/// use tabula_frame::row::{ensure_names, ensure_window, next_column, next_column_mut};
/// use tabula_frame::{AnyColumn, Column, Row, Table, TabulaResult};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Reading {
///     sensor: String,
///     value: f64,
/// }
///
/// impl Row for Reading {
///     const COLUMN_COUNT: usize = 2;
///
///     fn default_column_names() -> Vec<String> {
///         vec!["sensor".into(), "value".into()]
///     }
///
///     fn create_columns(capacity: usize, names: &[String]) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
///         ensure_names::<Self>(names)?;
///         let columns: Vec<Box<dyn AnyColumn>> = vec![
///             Box::new(Column::<String>::with_capacity(names[0].clone(), capacity)?),
///             Box::new(Column::<f64>::with_capacity(names[1].clone(), capacity)?),
///         ];
///         Ok(columns)
///     }
///
///     fn read_rows(
///         columns: &[Box<dyn AnyColumn>],
///         row_index: usize,
///         count: usize,
///         out: &mut Vec<Self>,
///     ) -> TabulaResult<()> {
///         ensure_window::<Self>(columns, row_index, count)?;
///         let mut iter = columns.iter();
///         let sensor = next_column::<String>(&mut iter)?;
///         let value = next_column::<f64>(&mut iter)?;
///         for row in row_index..row_index + count {
///             out.push(Reading {
///                 sensor: sensor.get(row)?.clone(),
///                 value: *value.get(row)?,
///             });
///         }
///         Ok(())
///     }
///
///     fn write_rows(
///         columns: &mut [Box<dyn AnyColumn>],
///         row_index: usize,
///         rows: &mut Vec<Self>,
///     ) -> TabulaResult<()> {
///         ensure_window::<Self>(columns, row_index, rows.len())?;
///         let mut iter = columns.iter_mut();
///         let sensor = next_column_mut::<String>(&mut iter)?;
///         let value = next_column_mut::<f64>(&mut iter)?;
///         for (row, reading) in (row_index..).zip(rows.drain(..)) {
///             sensor.set(row, reading.sensor)?;
///             value.set(row, reading.value)?;
///         }
///         Ok(())
///     }
/// }
///
/// let mut table = Table::<Reading>::new().unwrap();
/// table.push(Reading { sensor: "t1".into(), value: 21.5 }).unwrap();
/// assert_eq!(table.column_names().to_vec(), ["sensor", "value"]);
/// assert_eq!(table.get(0).unwrap().value, 21.5);
/// ```
pub trait Row: Sized + 'static {
    /// Number of columns the row shape occupies.
    const COLUMN_COUNT: usize;

    /// Column names used where the caller supplies none.
    ///
    /// Must return exactly `COLUMN_COUNT` names. Defaults to
    /// `"Column 1"` .. `"Column N"`.
    fn default_column_names() -> Vec<String> {
        (0..Self::COLUMN_COUNT).map(default_column_name).collect()
    }

    /// Creates one empty column per field, in field order.
    ///
    /// `names` holds exactly `COLUMN_COUNT` resolved names.
    fn create_columns(capacity: usize, names: &[String])
        -> TabulaResult<Vec<Box<dyn AnyColumn>>>;

    /// Appends rows `[row_index, row_index + count)` to `out`.
    fn read_rows(
        columns: &[Box<dyn AnyColumn>],
        row_index: usize,
        count: usize,
        out: &mut Vec<Self>,
    ) -> TabulaResult<()>;

    /// Writes `rows` into rows `[row_index, row_index + rows.len())`.
    ///
    /// Drains `rows` on success. The target rows must already exist.
    fn write_rows(
        columns: &mut [Box<dyn AnyColumn>],
        row_index: usize,
        rows: &mut Vec<Self>,
    ) -> TabulaResult<()>;
}

/// Returns the default name of the column at zero-based `position`.
///
/// ```rust
/// assert_eq!(tabula_frame::row::default_column_name(0), "Column 1");
/// ```
pub fn default_column_name(position: usize) -> String {
    format!("{} {}", DEFAULT_COLUMN_NAME_PREFIX, position + 1)
}

/// Resolves the column names of row type `R`.
///
/// Caller-supplied names fill the leading positions; the row type's
/// defaults fill the rest. Names beyond `R::COLUMN_COUNT` are ignored.
pub fn resolve_column_names<R: Row>(supplied: &[String]) -> TabulaResult<Vec<String>> {
    let defaults = R::default_column_names();
    if defaults.len() != R::COLUMN_COUNT {
        return Err(TabulaError::shape_not_supported(
            type_name::<R>(),
            format!(
                "declares {} columns but {} default names",
                R::COLUMN_COUNT,
                defaults.len()
            ),
        ));
    }

    Ok(supplied
        .iter()
        .cloned()
        .chain(defaults.into_iter().skip(supplied.len()))
        .take(R::COLUMN_COUNT)
        .collect())
}

/// Checks that exactly `R::COLUMN_COUNT` names were supplied.
pub fn ensure_names<R: Row>(names: &[String]) -> TabulaResult<()> {
    if names.len() != R::COLUMN_COUNT {
        return Err(TabulaError::shape_not_supported(
            type_name::<R>(),
            format!(
                "expected {} column names, got {}",
                R::COLUMN_COUNT,
                names.len()
            ),
        ));
    }
    Ok(())
}

/// Checks a row window against a column set before any element is touched.
///
/// The set must hold `R::COLUMN_COUNT` columns and every column must
/// contain `[row_index, row_index + count)`.
pub fn ensure_window<R: Row>(
    columns: &[Box<dyn AnyColumn>],
    row_index: usize,
    count: usize,
) -> TabulaResult<()> {
    if columns.len() != R::COLUMN_COUNT {
        return Err(TabulaError::shape_not_supported(
            type_name::<R>(),
            format!(
                "expected {} columns, got {}",
                R::COLUMN_COUNT,
                columns.len()
            ),
        ));
    }

    for column in columns {
        let len = column.len();
        match row_index.checked_add(count) {
            Some(end) if end <= len => {}
            _ => return Err(TabulaError::range_out_of_bounds(row_index, count, len)),
        }
    }
    Ok(())
}

/// Takes the next column from `iter` as a `Column<T>`.
pub fn next_column<'a, T: Element>(
    iter: &mut slice::Iter<'a, Box<dyn AnyColumn>>,
) -> TabulaResult<&'a Column<T>> {
    let column = iter.next().ok_or_else(|| missing_column::<T>())?;
    column.downcast_ref::<T>()
}

/// Takes the next column from `iter` as a mutable `Column<T>`.
pub fn next_column_mut<'a, T: Element>(
    iter: &mut slice::IterMut<'a, Box<dyn AnyColumn>>,
) -> TabulaResult<&'a mut Column<T>> {
    let column = iter.next().ok_or_else(|| missing_column::<T>())?;
    column.downcast_mut::<T>()
}

fn missing_column<T>() -> TabulaError {
    TabulaError::shape_not_supported(
        type_name::<T>(),
        "column set ended before every field was mapped",
    )
}
