//! # tabula-frame
//!
//! In-memory, column-oriented tables with a row-oriented API.
//!
//! - **Columns**: [`Column<T>`], a named growable array with power-of-two
//!   capacity, and [`AnyColumn`], its type-erased handle
//! - **Rows**: the [`Row`] trait maps a row shape onto a column set;
//!   tuples of 1 to 16 fields implement it out of the box
//! - **Tables**: [`Table<R>`] keeps one column per field in lockstep and
//!   detects mutation during enumeration through a generation counter
//!
//! ## Example
//!
//! ```rust
//! use tabula_frame::{Table, TabulaResult};
//!
//! fn example() -> TabulaResult<()> {
//!     let mut table = Table::<(String, u32)>::with_column_names(["name", "age"])?;
//!     table.push(("ada".to_string(), 36))?;
//!     table.push(("alan".to_string(), 41))?;
//!
//!     let ages = table.typed_column::<u32>(1)?;
//!     assert_eq!(ages.to_vec()?, vec![36, 41]);
//!
//!     for row in &table {
//!         let (name, _age) = row?;
//!         assert!(name.starts_with('a'));
//!     }
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! A table is not synchronized. It can move between threads but must not
//! be shared between them without external locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod row;
pub mod table;

pub use column::{AnyColumn, Column, Element};
pub use row::Row;
pub use table::{ColumnNames, Frame, RowCursor, Rows, Table};
pub use tabula_common::{ErrorCode, TabulaError, TabulaResult, TableConfig};
