//! `Row` implementations for tuples of 1 to 16 fields.
//!
//! Tuples up to `DIRECT_ROW_WIDTH` fields map each field straight onto its
//! column. Wider tuples are split into a head of `DIRECT_ROW_WIDTH` fields
//! and a tail tuple holding the rest. The tail is itself a `Row`, so a
//! 16-tuple maps as 7 + (7 + 2). Tail values are marshalled through a
//! scratch buffer leased from the global pool.

use tabula_common::constants::DIRECT_ROW_WIDTH;
use tabula_common::error::TabulaResult;
use tabula_common::memory::ScratchPool;

use super::{ensure_names, ensure_window, next_column, next_column_mut, Row};
use crate::column::{AnyColumn, Column, Element};

macro_rules! direct_row {
    ($width:literal; $( ($T:ident, $col:ident, $val:ident, $idx:tt) ),+) => {
        impl<$($T: Element),+> Row for ($($T,)+) {
            const COLUMN_COUNT: usize = $width;

            fn create_columns(
                capacity: usize,
                names: &[String],
            ) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
                ensure_names::<Self>(names)?;
                let mut columns: Vec<Box<dyn AnyColumn>> = Vec::with_capacity($width);
                $(
                    columns.push(Box::new(Column::<$T>::with_capacity(
                        names[$idx].clone(),
                        capacity,
                    )?));
                )+
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
                $( let $col = next_column::<$T>(&mut iter)?; )+

                out.reserve(count);
                for row in row_index..row_index + count {
                    out.push(($( $col.get(row)?.clone(), )+));
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
                $( let $col = next_column_mut::<$T>(&mut iter)?; )+

                for (row, ($( $val, )+)) in (row_index..).zip(rows.drain(..)) {
                    $( $col.set(row, $val)?; )+
                }
                Ok(())
            }
        }
    };
}

macro_rules! wide_row {
    (
        $( ($T:ident, $col:ident, $val:ident, $idx:tt) ),+ ;
        $( ($R:ident, $rest:ident) ),+
    ) => {
        impl<$($T: Element,)+ $($R: Element),+> Row for ($($T,)+ $($R,)+)
        where
            ($($R,)+): Row,
        {
            const COLUMN_COUNT: usize = DIRECT_ROW_WIDTH + <($($R,)+) as Row>::COLUMN_COUNT;

            fn create_columns(
                capacity: usize,
                names: &[String],
            ) -> TabulaResult<Vec<Box<dyn AnyColumn>>> {
                ensure_names::<Self>(names)?;
                let (head, tail) = names.split_at(DIRECT_ROW_WIDTH);

                let mut columns: Vec<Box<dyn AnyColumn>> = Vec::with_capacity(Self::COLUMN_COUNT);
                $(
                    columns.push(Box::new(Column::<$T>::with_capacity(
                        head[$idx].clone(),
                        capacity,
                    )?));
                )+
                columns.extend(<($($R,)+) as Row>::create_columns(capacity, tail)?);
                Ok(columns)
            }

            fn read_rows(
                columns: &[Box<dyn AnyColumn>],
                row_index: usize,
                count: usize,
                out: &mut Vec<Self>,
            ) -> TabulaResult<()> {
                ensure_window::<Self>(columns, row_index, count)?;
                let (head, tail) = columns.split_at(DIRECT_ROW_WIDTH);
                let mut iter = head.iter();
                $( let $col = next_column::<$T>(&mut iter)?; )+

                let mut rest = ScratchPool::global().lease::<($($R,)+)>(count);
                <($($R,)+) as Row>::read_rows(tail, row_index, count, &mut *rest)?;

                out.reserve(count);
                for (row, ($( $rest, )+)) in (row_index..).zip(rest.drain(..)) {
                    out.push(($( $col.get(row)?.clone(), )+ $( $rest, )+));
                }
                Ok(())
            }

            fn write_rows(
                columns: &mut [Box<dyn AnyColumn>],
                row_index: usize,
                rows: &mut Vec<Self>,
            ) -> TabulaResult<()> {
                ensure_window::<Self>(columns, row_index, rows.len())?;
                let (head, tail) = columns.split_at_mut(DIRECT_ROW_WIDTH);
                let mut iter = head.iter_mut();
                $( let $col = next_column_mut::<$T>(&mut iter)?; )+

                // Column types are fixed by create_columns, so the tail
                // cannot reject the values once the head is written.
                let mut rest = ScratchPool::global().lease::<($($R,)+)>(rows.len());
                for (row, ($( $val, )+ $( $rest, )+)) in (row_index..).zip(rows.drain(..)) {
                    $( $col.set(row, $val)?; )+
                    rest.push(($( $rest, )+));
                }
                <($($R,)+) as Row>::write_rows(tail, row_index, &mut *rest)
            }
        }
    };
}

direct_row!(1; (T1, c1, v1, 0));
direct_row!(2; (T1, c1, v1, 0), (T2, c2, v2, 1));
direct_row!(3; (T1, c1, v1, 0), (T2, c2, v2, 1), (T3, c3, v3, 2));
direct_row!(4; (T1, c1, v1, 0), (T2, c2, v2, 1), (T3, c3, v3, 2), (T4, c4, v4, 3));
direct_row!(5;
    (T1, c1, v1, 0), (T2, c2, v2, 1), (T3, c3, v3, 2), (T4, c4, v4, 3), (T5, c5, v5, 4)
);
direct_row!(6;
    (T1, c1, v1, 0), (T2, c2, v2, 1), (T3, c3, v3, 2), (T4, c4, v4, 3), (T5, c5, v5, 4),
    (T6, c6, v6, 5)
);
direct_row!(7;
    (T1, c1, v1, 0), (T2, c2, v2, 1), (T3, c3, v3, 2), (T4, c4, v4, 3), (T5, c5, v5, 4),
    (T6, c6, v6, 5), (T7, c7, v7, 6)
);

macro_rules! wide_rows {
    ($( [$( ($R:ident, $rest:ident) ),+] )+) => {
        $(
            wide_row!(
                (T1, c1, v1, 0), (T2, c2, v2, 1), (T3, c3, v3, 2), (T4, c4, v4, 3),
                (T5, c5, v5, 4), (T6, c6, v6, 5), (T7, c7, v7, 6);
                $( ($R, $rest) ),+
            );
        )+
    };
}

wide_rows! {
    [(R1, r1)]
    [(R1, r1), (R2, r2)]
    [(R1, r1), (R2, r2), (R3, r3)]
    [(R1, r1), (R2, r2), (R3, r3), (R4, r4)]
    [(R1, r1), (R2, r2), (R3, r3), (R4, r4), (R5, r5)]
    [(R1, r1), (R2, r2), (R3, r3), (R4, r4), (R5, r5), (R6, r6)]
    [(R1, r1), (R2, r2), (R3, r3), (R4, r4), (R5, r5), (R6, r6), (R7, r7)]
    [(R1, r1), (R2, r2), (R3, r3), (R4, r4), (R5, r5), (R6, r6), (R7, r7), (R8, r8)]
    [(R1, r1), (R2, r2), (R3, r3), (R4, r4), (R5, r5), (R6, r6), (R7, r7), (R8, r8), (R9, r9)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::resolve_column_names;
    use tabula_common::constants::MAX_TUPLE_WIDTH;

    type Wide = (u8, u16, u32, u64, i8, i16, i32, i64, bool, char, String, f32, f64, usize, isize, u128);

    fn columns_for<R: Row>(capacity: usize) -> Vec<Box<dyn AnyColumn>> {
        let names = resolve_column_names::<R>(&[]).unwrap();
        R::create_columns(capacity, &names).unwrap()
    }

    fn grow(columns: &mut [Box<dyn AnyColumn>], count: usize) {
        for column in columns {
            column.expand(0, count).unwrap();
        }
    }

    type Halves = (
        (u8, u16, u32, u64, i8, i16, i32, i64),
        (bool, char, String, f32, f64, usize, isize, u128),
    );

    // Tuples past 12 fields have no PartialEq or Debug.
    fn halves(row: &Wide) -> Halves {
        let r = row.clone();
        (
            (r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7),
            (r.8, r.9, r.10, r.11, r.12, r.13, r.14, r.15),
        )
    }

    fn wide_row(seed: u8) -> Wide {
        (
            seed,
            u16::from(seed) * 2,
            u32::from(seed) * 3,
            u64::from(seed) * 4,
            -(seed as i8 % 100),
            -i16::from(seed),
            i32::from(seed) << 8,
            -i64::from(seed) << 16,
            seed % 2 == 0,
            char::from(b'a' + seed % 26),
            format!("row-{seed}"),
            f32::from(seed) / 2.0,
            f64::from(seed) * 1.5,
            usize::from(seed) + 1000,
            -isize::from(seed) - 1000,
            u128::from(seed) << 100,
        )
    }

    #[test]
    fn test_column_counts() {
        assert_eq!(<(u8,)>::COLUMN_COUNT, 1);
        assert_eq!(<(u8, u8, u8, u8, u8, u8, u8)>::COLUMN_COUNT, 7);
        assert_eq!(<(u8, u8, u8, u8, u8, u8, u8, u8)>::COLUMN_COUNT, 8);
        assert_eq!(<Wide as Row>::COLUMN_COUNT, MAX_TUPLE_WIDTH);
    }

    #[test]
    fn test_create_columns_types_and_names() {
        let columns = columns_for::<(u8, String, f64)>(10);

        assert_eq!(columns.len(), 3);
        assert!(columns[0].is::<u8>());
        assert!(columns[1].is::<String>());
        assert!(columns[2].is::<f64>());
        assert_eq!(columns[2].name(), "Column 3");
        assert!(columns.iter().all(|c| c.capacity() == 256 && c.is_empty()));
    }

    #[test]
    fn test_wide_default_names_are_contiguous() {
        let columns = columns_for::<Wide>(0);
        let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
        let expected: Vec<String> = (1..=16).map(|i| format!("Column {i}")).collect();

        assert_eq!(names, expected);
        assert!(columns[15].is::<u128>());
        assert!(columns[7].is::<i64>());
    }

    #[test]
    fn test_direct_write_then_read() {
        let mut columns = columns_for::<(i32, String)>(0);
        grow(&mut columns, 3);

        let mut rows = vec![(1, "a".to_string()), (2, "b".to_string()), (3, "c".to_string())];
        <(i32, String)>::write_rows(&mut columns, 0, &mut rows).unwrap();
        assert!(rows.is_empty());

        let mut out = Vec::new();
        <(i32, String)>::read_rows(&columns, 1, 2, &mut out).unwrap();
        assert_eq!(out, vec![(2, "b".to_string()), (3, "c".to_string())]);
    }

    #[test]
    fn test_wide_write_then_read() {
        let mut columns = columns_for::<Wide>(0);
        grow(&mut columns, 4);

        let original: Vec<Wide> = (10..14).map(wide_row).collect();
        let mut rows = original.clone();
        Wide::write_rows(&mut columns, 0, &mut rows).unwrap();

        let mut out = Vec::new();
        Wide::read_rows(&columns, 0, 4, &mut out).unwrap();
        assert_eq!(out.len(), 4);
        for (read, written) in out.iter().zip(&original) {
            assert_eq!(halves(read), halves(written));
        }

        out.clear();
        Wide::read_rows(&columns, 2, 1, &mut out).unwrap();
        assert_eq!(halves(&out[0]), halves(&wide_row(12)));
    }

    #[test]
    fn test_read_appends() {
        let mut columns = columns_for::<(u8,)>(0);
        grow(&mut columns, 2);
        <(u8,)>::write_rows(&mut columns, 0, &mut vec![(1,), (2,)]).unwrap();

        let mut out = vec![(0,)];
        <(u8,)>::read_rows(&columns, 0, 2, &mut out).unwrap();
        assert_eq!(out, vec![(0,), (1,), (2,)]);
    }

    #[test]
    fn test_window_rejected_before_write() {
        let mut columns = columns_for::<(u8, u8)>(0);
        grow(&mut columns, 1);

        let mut rows = vec![(1, 1), (2, 2)];
        let err = <(u8, u8)>::write_rows(&mut columns, 0, &mut rows).unwrap_err();

        assert!(err.is_range_error());
        assert_eq!(rows.len(), 2);
        assert!(columns[0].downcast_ref::<u8>().unwrap().get(0).is_err());
    }

    #[test]
    fn test_wrong_column_types_rejected() {
        let mut columns = columns_for::<(u8, u8)>(0);
        grow(&mut columns, 1);

        let err = <(u8, String)>::read_rows(&columns, 0, 1, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, tabula_common::TabulaError::TypeMismatch { .. }));
    }

    #[test]
    fn test_wide_tail_failure_releases_scratch() {
        use std::sync::Arc;

        // Tail type private to this test keeps the global free list for it
        // untouched by other tests.
        #[derive(Clone)]
        struct Tag(Arc<u8>);

        type Tagged = (u8, u8, u8, u8, u8, u8, u8, Tag);
        type Plain = (u8, u8, u8, u8, u8, u8, u8, u32);

        let pool = ScratchPool::global();
        let mut columns = columns_for::<Plain>(0);
        grow(&mut columns, 2);

        let err = Tagged::read_rows(&columns, 0, 2, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, tabula_common::TabulaError::TypeMismatch { .. }));
        assert_eq!(pool.retained_for::<(Tag,)>(), 1);

        let shared = Arc::new(7);
        let mut rows = vec![(1, 2, 3, 4, 5, 6, 7, Tag(Arc::clone(&shared)))];
        let err = Tagged::write_rows(&mut columns, 0, &mut rows).unwrap_err();
        assert!(matches!(err, tabula_common::TabulaError::TypeMismatch { .. }));

        // The lease came back emptied, dropping the staged tail values.
        assert_eq!(pool.retained_for::<(Tag,)>(), 1);
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
