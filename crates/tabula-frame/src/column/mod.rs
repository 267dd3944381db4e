//! Typed columns and the type-erased column handle.
//!
//! A [`Column<T>`] stores one row field for every row of a table. Tables
//! hold their columns as `Box<dyn AnyColumn>` so that columns of different
//! element types can live in one ordered set; structural operations
//! (expand, shrink, clear) go through the handle, and typed access goes
//! through a checked downcast.

mod growable;

use std::any::{type_name, Any};

use tabula_common::error::{TabulaError, TabulaResult};

pub use growable::Column;

/// Values that can be stored in a column.
///
/// Blanket-implemented for every `Clone + Send + 'static` type.
pub trait Element: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> Element for T {}

/// A column handle with its element type erased.
///
/// Exposes only the operations that do not need to know the element type.
/// Use [`downcast_ref`](#method.downcast_ref) or
/// [`downcast_mut`](#method.downcast_mut) for typed access.
pub trait AnyColumn: Any + Send + 'static {
    /// Returns the column name.
    fn name(&self) -> &str;

    /// Returns the number of live elements.
    fn len(&self) -> usize;

    /// Returns true if the column holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of allocated slots.
    fn capacity(&self) -> usize;

    /// Returns the name of the stored element type.
    fn element_type(&self) -> &'static str;

    /// Opens `count` vacant slots at `at`, shifting later elements right.
    fn expand(&mut self, at: usize, count: usize) -> TabulaResult<()>;

    /// Removes `count` elements starting at `at`, shifting later elements left.
    fn shrink(&mut self, at: usize, count: usize) -> TabulaResult<()>;

    /// Removes every element, keeping the allocation.
    fn clear(&mut self);

    /// Returns an independent copy of the live elements.
    fn boxed_copy(&self) -> Box<dyn AnyColumn>;

    /// Returns the column as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns the column as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn AnyColumn {
    /// Returns true if the column stores elements of type `T`.
    pub fn is<T: Element>(&self) -> bool {
        self.as_any().is::<Column<T>>()
    }

    /// Returns the typed column, or `TypeMismatch` if it stores another type.
    pub fn downcast_ref<T: Element>(&self) -> TabulaResult<&Column<T>> {
        self.as_any()
            .downcast_ref::<Column<T>>()
            .ok_or_else(|| self.type_mismatch::<T>())
    }

    /// Returns the typed column mutably, or `TypeMismatch` if it stores
    /// another type.
    pub fn downcast_mut<T: Element>(&mut self) -> TabulaResult<&mut Column<T>> {
        if !self.is::<T>() {
            return Err(self.type_mismatch::<T>());
        }
        // The mutable borrow below ends any access to `self`.
        let column = self.name().to_string();
        let actual = self.element_type();
        self.as_any_mut()
            .downcast_mut::<Column<T>>()
            .ok_or_else(|| TabulaError::TypeMismatch {
                column,
                expected: type_name::<T>().to_string(),
                actual: actual.to_string(),
            })
    }

    fn type_mismatch<T: Element>(&self) -> TabulaError {
        TabulaError::TypeMismatch {
            column: self.name().to_string(),
            expected: type_name::<T>().to_string(),
            actual: self.element_type().to_string(),
        }
    }
}

impl std::fmt::Debug for dyn AnyColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyColumn")
            .field("name", &self.name())
            .field("element_type", &self.element_type())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_common::ErrorCode;

    fn boxed(values: Vec<i32>) -> Box<dyn AnyColumn> {
        Box::new(Column::from_values("n", values).unwrap())
    }

    #[test]
    fn test_handle_structural_ops() {
        let mut column = boxed(vec![1, 2, 3, 4]);

        column.shrink(1, 2).unwrap();
        assert_eq!(column.len(), 2);

        column.expand(1, 1).unwrap();
        assert_eq!(column.len(), 3);

        column.clear();
        assert!(column.is_empty());
        assert_eq!(column.capacity(), 256);
    }

    #[test]
    fn test_downcast_ref() {
        let column = boxed(vec![10, 20]);

        assert!(column.is::<i32>());
        assert_eq!(column.element_type(), "i32");

        let typed = column.downcast_ref::<i32>().unwrap();
        assert_eq!(*typed.get(1).unwrap(), 20);
    }

    #[test]
    fn test_downcast_mismatch() {
        let mut column = boxed(vec![10, 20]);

        let err = column.downcast_ref::<String>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
        match err {
            TabulaError::TypeMismatch {
                column,
                expected,
                actual,
            } => {
                assert_eq!(column, "n");
                assert!(expected.contains("String"));
                assert_eq!(actual, "i32");
            }
            other => panic!("unexpected error: {other}"),
        }

        match column.downcast_mut::<u64>().unwrap_err() {
            TabulaError::TypeMismatch {
                column, expected, ..
            } => {
                assert_eq!(column, "n");
                assert_eq!(expected, "u64");
            }
            other => panic!("unexpected error: {other}"),
        }
        column.downcast_mut::<i32>().unwrap().set(0, 11).unwrap();
        assert_eq!(*column.downcast_ref::<i32>().unwrap().get(0).unwrap(), 11);
    }

    #[test]
    fn test_boxed_copy_is_independent() {
        let mut column = boxed(vec![1, 2, 3]);
        let copy = column.boxed_copy();

        column.clear();

        assert_eq!(copy.len(), 3);
        assert_eq!(copy.name(), "n");
        assert_eq!(copy.downcast_ref::<i32>().unwrap().to_vec().unwrap(), vec![1, 2, 3]);
    }
}
