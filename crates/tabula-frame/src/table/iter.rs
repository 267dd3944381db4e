//! Row enumeration with mutation detection.
//!
//! Each enumeration captures the table's row count and generation when it
//! starts. Every step first checks for the end of the captured range, then
//! compares the captured generation with the live one and fails with
//! `ConcurrentModification` if the table changed in between.
//!
//! [`Rows`] borrows the table and cannot observe a mutation. [`RowCursor`]
//! holds no borrow, so the table can be mutated between steps; the next
//! step reports it. A cursor also records which table it was started on and
//! refuses to step through any other.

use std::iter::FusedIterator;

use tabula_common::error::{TabulaError, TabulaResult};
use tracing::debug;

use super::Table;
use crate::row::Row;

/// A detached position in a table enumeration.
///
/// A cursor belongs to the table it was started on. Stepping it with a
/// different table, including a clone, fails with `ForeignCursor`.
///
/// # Example
///
/// ```rust
/// use tabula_frame::Table;
///
/// let mut table = Table::from_rows([(1,), (2,), (3,)]).unwrap();
/// let mut cursor = table.cursor();
///
/// assert_eq!(cursor.next_row(&table).unwrap().unwrap(), (1,));
/// table.push((4,)).unwrap();
///
/// let err = cursor.next_row(&table).unwrap().unwrap_err();
/// assert!(err.is_concurrent_modification());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCursor {
    /// Id of the table the cursor was started on.
    table_id: u64,
    /// Index of the next row to yield.
    position: usize,
    /// Row count captured at start.
    row_count: usize,
    /// Generation captured at start.
    generation: u64,
}

impl RowCursor {
    fn start<R: Row>(table: &Table<R>) -> Self {
        Self {
            table_id: table.id,
            position: 0,
            row_count: table.row_count(),
            generation: table.generation(),
        }
    }

    /// Returns the next row, or `None` once the captured range is exhausted.
    pub fn next_row<R: Row>(&mut self, table: &Table<R>) -> Option<TabulaResult<R>> {
        if self.position >= self.row_count {
            return None;
        }

        if table.id != self.table_id {
            return Some(Err(TabulaError::ForeignCursor {
                cursor_table: self.table_id,
                table: table.id,
            }));
        }

        let live = table.generation();
        if live != self.generation {
            debug!(
                position = self.position,
                expected = self.generation,
                actual = live,
                "table modified during enumeration"
            );
            return Some(Err(TabulaError::ConcurrentModification {
                expected: self.generation,
                actual: live,
            }));
        }

        let row = table.get(self.position);
        if row.is_ok() {
            self.position += 1;
        }
        Some(row)
    }

    /// Starts over from the first row, capturing the table's current state.
    ///
    /// Rebinds the cursor to `table`.
    pub fn restart<R: Row>(&mut self, table: &Table<R>) {
        *self = Self::start(table);
    }

    /// Returns the index of the next row.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of rows left in the captured range.
    pub fn remaining(&self) -> usize {
        self.row_count.saturating_sub(self.position)
    }

    /// Returns the generation captured at start.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Iterator over the rows of a table.
///
/// Yields `Err` at most once; iteration ends after an error.
pub struct Rows<'a, R: Row> {
    table: &'a Table<R>,
    cursor: RowCursor,
    failed: bool,
}

impl<R: Row> Iterator for Rows<'_, R> {
    type Item = TabulaResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.cursor.next_row(self.table);
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.cursor.remaining()))
        }
    }
}

impl<R: Row> FusedIterator for Rows<'_, R> {}

impl<R: Row> std::fmt::Debug for Rows<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("cursor", &self.cursor)
            .field("failed", &self.failed)
            .finish()
    }
}

impl<R: Row> Table<R> {
    /// Returns an iterator over the rows, in order.
    ///
    /// Call again to restart from the first row.
    pub fn rows(&self) -> Rows<'_, R> {
        Rows {
            table: self,
            cursor: RowCursor::start(self),
            failed: false,
        }
    }

    /// Returns a cursor that does not borrow the table.
    ///
    /// Mutating the table between [`RowCursor::next_row`] calls makes the
    /// next call fail with `ConcurrentModification`.
    pub fn cursor(&self) -> RowCursor {
        RowCursor::start(self)
    }
}

impl<'a, R: Row> IntoIterator for &'a Table<R> {
    type Item = TabulaResult<R>;
    type IntoIter = Rows<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
