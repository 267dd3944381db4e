//! Integration tests for user-defined record rows.

use tabula_frame::row::{ensure_names, ensure_window, next_column, next_column_mut};
use tabula_frame::{AnyColumn, Column, ErrorCode, Row, Table, TabulaError, TabulaResult};
use tabula_test::utils::{assert_columns_in_sync, init_tracing, read_all};

#[derive(Debug, Clone, PartialEq)]
struct Trade {
    symbol: String,
    quantity: i64,
    price: f64,
}

impl Trade {
    fn new(symbol: &str, quantity: i64, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            quantity,
            price,
        }
    }
}

impl Row for Trade {
    const COLUMN_COUNT: usize = 3;

    fn default_column_names() -> Vec<String> {
        vec!["symbol".into(), "quantity".into(), "price".into()]
    }

    fn create_columns(capacity: usize, names: &[String]) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
        ensure_names::<Self>(names)?;
        let columns: Vec<Box<dyn AnyColumn>> = vec![
            Box::new(Column::<String>::with_capacity(names[0].clone(), capacity)?),
            Box::new(Column::<i64>::with_capacity(names[1].clone(), capacity)?),
            Box::new(Column::<f64>::with_capacity(names[2].clone(), capacity)?),
        ];
        Ok(columns)
    }

    fn read_rows(
        columns: &[Box<dyn AnyColumn>],
        row_index: usize,
        count: usize,
        out: &mut Vec<Self>,
    ) -> TabulaResult<()> {
        ensure_window::<Self>(columns, row_index, count)?;
        let mut iter = columns.iter();
        let symbol = next_column::<String>(&mut iter)?;
        let quantity = next_column::<i64>(&mut iter)?;
        let price = next_column::<f64>(&mut iter)?;

        for row in row_index..row_index + count {
            out.push(Trade {
                symbol: symbol.get(row)?.clone(),
                quantity: *quantity.get(row)?,
                price: *price.get(row)?,
            });
        }
        Ok(())
    }

    fn write_rows(
        columns: &mut [Box<dyn AnyColumn>],
        row_index: usize,
        rows: &mut Vec<Self>,
    ) -> TabulaResult<()> {
        ensure_window::<Self>(columns, row_index, rows.len())?;
        let mut iter = columns.iter_mut();
        let symbol = next_column_mut::<String>(&mut iter)?;
        let quantity = next_column_mut::<i64>(&mut iter)?;
        let price = next_column_mut::<f64>(&mut iter)?;

        for (row, trade) in (row_index..).zip(rows.drain(..)) {
            symbol.set(row, trade.symbol)?;
            quantity.set(row, trade.quantity)?;
            price.set(row, trade.price)?;
        }
        Ok(())
    }
}

/// A row type that claims no columns.
struct Empty;

impl Row for Empty {
    const COLUMN_COUNT: usize = 0;

    fn create_columns(_: usize, _: &[String]) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
        Ok(Vec::new())
    }

    fn read_rows(_: &[Box<dyn AnyColumn>], _: usize, _: usize, _: &mut Vec<Self>) -> TabulaResult<()> {
        Ok(())
    }

    fn write_rows(_: &mut [Box<dyn AnyColumn>], _: usize, _: &mut Vec<Self>) -> TabulaResult<()> {
        Ok(())
    }
}

/// A row type whose column set does not match its declared width.
struct Lopsided;

impl Row for Lopsided {
    const COLUMN_COUNT: usize = 2;

    fn create_columns(capacity: usize, names: &[String]) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
        let columns: Vec<Box<dyn AnyColumn>> =
            vec![Box::new(Column::<u8>::with_capacity(names[0].clone(), capacity)?)];
        Ok(columns)
    }

    fn read_rows(_: &[Box<dyn AnyColumn>], _: usize, _: usize, _: &mut Vec<Self>) -> TabulaResult<()> {
        Ok(())
    }

    fn write_rows(_: &mut [Box<dyn AnyColumn>], _: usize, _: &mut Vec<Self>) -> TabulaResult<()> {
        Ok(())
    }
}

/// A row type with the wrong number of default names.
struct Misnamed;

impl Row for Misnamed {
    const COLUMN_COUNT: usize = 2;

    fn default_column_names() -> Vec<String> {
        vec!["only".into()]
    }

    fn create_columns(_: usize, _: &[String]) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
        Ok(Vec::new())
    }

    fn read_rows(_: &[Box<dyn AnyColumn>], _: usize, _: usize, _: &mut Vec<Self>) -> TabulaResult<()> {
        Ok(())
    }

    fn write_rows(_: &mut [Box<dyn AnyColumn>], _: usize, _: &mut Vec<Self>) -> TabulaResult<()> {
        Ok(())
    }
}

fn trades() -> Vec<Trade> {
    vec![
        Trade::new("ACME", 100, 12.5),
        Trade::new("INIT", -40, 3.25),
        Trade::new("ACME", 10, 12.75),
    ]
}

/// Records name their own columns.
#[test]
fn test_record_column_names() {
    init_tracing();

    let table = Table::<Trade>::new().unwrap();
    assert_eq!(table.column_names().to_vec(), ["symbol", "quantity", "price"]);

    let renamed = Table::<Trade>::with_column_names(["ticker"]).unwrap();
    assert_eq!(renamed.column_names().to_vec(), ["ticker", "quantity", "price"]);
}

/// Records round-trip through the table API.
#[test]
fn test_record_roundtrip() {
    let mut table = Table::from_rows(trades()).unwrap();
    assert_eq!(read_all(&table), trades());

    table.insert(1, Trade::new("NEW", 1, 1.0)).unwrap();
    table.remove_at(0).unwrap();
    table.set(2, Trade::new("LAST", 2, 2.0)).unwrap();

    assert_eq!(
        read_all(&table),
        vec![
            Trade::new("NEW", 1, 1.0),
            Trade::new("INIT", -40, 3.25),
            Trade::new("LAST", 2, 2.0),
        ]
    );
    assert_columns_in_sync(&table);
}

/// Typed column views expose one field across all rows.
#[test]
fn test_record_typed_columns() {
    let table = Table::from_rows(trades()).unwrap();

    let quantity: i64 = table.typed_column::<i64>(1).unwrap().to_vec().unwrap().iter().sum();
    assert_eq!(quantity, 70);

    let err = table.typed_column::<f32>(2).unwrap_err();
    match err {
        TabulaError::TypeMismatch { column, expected, actual } => {
            assert_eq!(column, "price");
            assert_eq!(expected, "f32");
            assert_eq!(actual, "f64");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A row type with no columns is rejected at construction.
#[test]
fn test_zero_width_rejected() {
    let err = Table::<Empty>::new().unwrap_err();
    assert_eq!(err.code(), ErrorCode::ShapeNotSupported);
}

/// A column set of the wrong width is rejected at construction.
#[test]
fn test_wrong_column_count_rejected() {
    let err = Table::<Lopsided>::new().unwrap_err();
    assert_eq!(err.code(), ErrorCode::ShapeNotSupported);
    assert!(err.to_string().contains("created 1"));
}

/// A default name list of the wrong length is rejected at construction.
#[test]
fn test_wrong_default_names_rejected() {
    let err = Table::<Misnamed>::new().unwrap_err();
    assert!(matches!(err, TabulaError::ShapeNotSupported { .. }));
}
