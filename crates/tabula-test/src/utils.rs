use tabula_frame::{Row, Table};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber.
///
/// Filtering follows `RUST_LOG`. Safe to call from every test; only the
/// first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reads every row of `table` through its row iterator.
///
/// # Panics
///
/// Panics if any row fails to read.
pub fn read_all<R: Row>(table: &Table<R>) -> Vec<R> {
    table
        .rows()
        .collect::<Result<Vec<_>, _>>()
        .expect("table rows readable")
}

/// Asserts that every column holds exactly `row_count` elements.
///
/// # Panics
///
/// Panics if a column is out of sync with the table.
pub fn assert_columns_in_sync<R: Row>(table: &Table<R>) {
    let row_count = table.row_count();
    for position in 0..table.column_count() {
        let column = table.column(position).expect("column in range");
        assert_eq!(
            column.len(),
            row_count,
            "column '{}' has {} elements, table has {} rows",
            column.name(),
            column.len(),
            row_count
        );
    }
}
