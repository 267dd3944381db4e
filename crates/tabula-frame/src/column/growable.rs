//! Growable typed column.
//!
//! # Layout
//!
//! The backing store is a `Vec<Option<T>>` whose length is the column
//! capacity. Slots `[0, len)` are live; slots `[len, capacity)` are always
//! `None`. Capacity is a power of two, at least `MIN_COLUMN_CAPACITY`, and
//! never shrinks.
//!
//! `expand` opens `None` slots inside the live range. Such a slot is
//! vacant until it is written, and reading it returns `VacantSlot`.
//! `shrink` and `clear` overwrite removed slots with `None`, so removed
//! values are dropped immediately rather than lingering in spare capacity.

use std::any::{type_name, Any};

use tabula_common::constants::capacity_for;
use tabula_common::error::{TabulaError, TabulaResult};
use tracing::trace;

use super::{AnyColumn, Element};

/// A named, contiguous, growable sequence of `T`.
///
/// # Example
///
/// ```rust
/// use tabula_frame::Column;
///
/// let mut column = Column::with_capacity("id", 257).unwrap();
/// assert_eq!(column.capacity(), 512);
///
/// column.push(1u32).unwrap();
/// column.push(3).unwrap();
/// column.insert(1, 2).unwrap();
/// assert_eq!(column.to_vec().unwrap(), vec![1, 2, 3]);
/// ```
pub struct Column<T> {
    /// Column name, fixed at construction.
    name: String,
    /// Backing slots; `slots.len()` is the capacity.
    slots: Vec<Option<T>>,
    /// Number of live slots.
    len: usize,
}

impl<T> Column<T> {
    /// Creates an empty column with room for at least `capacity_hint` elements.
    ///
    /// The capacity is rounded up to a power of two, at least 256.
    pub fn with_capacity(name: impl Into<String>, capacity_hint: usize) -> TabulaResult<Self> {
        let capacity = capacity_for(capacity_hint).ok_or(TabulaError::CapacityOverflow {
            requested: capacity_hint,
        })?;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TabulaError::CapacityOverflow {
                requested: capacity_hint,
            })?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            name: name.into(),
            slots,
            len: 0,
        })
    }

    /// Creates a column holding `values` in order.
    pub fn from_values<I>(name: impl Into<String>, values: I) -> TabulaResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let mut column = Self::with_capacity(name, values.len())?;
        column.len = values.len();
        for (slot, value) in column.slots.iter_mut().zip(values) {
            *slot = Some(value);
        }
        Ok(column)
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the column holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> TabulaResult<&T> {
        self.check_index(index)?;
        self.slots[index]
            .as_ref()
            .ok_or(TabulaError::VacantSlot { index })
    }

    /// Returns the element at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> TabulaResult<&mut T> {
        self.check_index(index)?;
        self.slots[index]
            .as_mut()
            .ok_or(TabulaError::VacantSlot { index })
    }

    /// Replaces the element at `index`.
    ///
    /// Also fills a slot left vacant by [`expand`](Self::expand).
    pub fn set(&mut self, index: usize, value: T) -> TabulaResult<()> {
        self.check_index(index)?;
        self.slots[index] = Some(value);
        Ok(())
    }

    /// Opens `count` vacant slots at `at`.
    ///
    /// Elements at `[at, len)` move to `[at + count, len + count)`. The
    /// storage is reallocated when the new length exceeds the capacity.
    pub fn expand(&mut self, at: usize, count: usize) -> TabulaResult<()> {
        if at > self.len {
            return Err(TabulaError::index_out_of_range(at, self.len));
        }
        if count == 0 {
            return Ok(());
        }

        let new_len = self
            .len
            .checked_add(count)
            .ok_or(TabulaError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        self.reserve_for(new_len)?;

        // [len, new_len) is all None; rotating it to the front opens the gap.
        self.slots[at..new_len].rotate_right(count);
        self.len = new_len;
        Ok(())
    }

    /// Removes the run `[at, at + count)`.
    ///
    /// Removed values are dropped and later elements shift left. The
    /// capacity is unchanged.
    pub fn shrink(&mut self, at: usize, count: usize) -> TabulaResult<()> {
        let end = self.check_window(at, count)?;
        if count == 0 {
            return Ok(());
        }

        for slot in &mut self.slots[at..end] {
            *slot = None;
        }
        self.slots[at..self.len].rotate_left(count);
        self.len -= count;
        Ok(())
    }

    /// Appends a value.
    pub fn push(&mut self, value: T) -> TabulaResult<()> {
        self.insert(self.len, value)
    }

    /// Appends every value of `values`.
    pub fn extend_values<I>(&mut self, values: I) -> TabulaResult<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.insert_range(self.len, values)
    }

    /// Inserts a value at `at`.
    pub fn insert(&mut self, at: usize, value: T) -> TabulaResult<()> {
        self.expand(at, 1)?;
        self.slots[at] = Some(value);
        Ok(())
    }

    /// Inserts `values` at `at`, in order.
    pub fn insert_range<I>(&mut self, at: usize, values: I) -> TabulaResult<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let count = values.len();
        self.expand(at, count)?;
        for (slot, value) in self.slots[at..at + count].iter_mut().zip(values) {
            *slot = Some(value);
        }
        Ok(())
    }

    /// Removes the element at `at`.
    pub fn remove_at(&mut self, at: usize) -> TabulaResult<()> {
        self.check_index(at)?;
        self.shrink(at, 1)
    }

    /// Removes `count` elements starting at `at`.
    pub fn remove_range(&mut self, at: usize, count: usize) -> TabulaResult<()> {
        self.shrink(at, count)
    }

    /// Removes every element, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }

    fn reserve_for(&mut self, required: usize) -> TabulaResult<()> {
        let old_capacity = self.capacity();
        if required <= old_capacity {
            return Ok(());
        }

        let new_capacity =
            capacity_for(required).ok_or(TabulaError::CapacityOverflow { requested: required })?;
        self.slots
            .try_reserve_exact(new_capacity - old_capacity)
            .map_err(|_| TabulaError::CapacityOverflow { requested: required })?;
        self.slots.resize_with(new_capacity, || None);

        trace!(
            column = %self.name,
            old_capacity,
            new_capacity,
            "column reallocated"
        );
        Ok(())
    }

    fn check_index(&self, index: usize) -> TabulaResult<()> {
        if index >= self.len {
            return Err(TabulaError::index_out_of_range(index, self.len));
        }
        Ok(())
    }

    /// Validates `[at, at + count)` against the live range and returns its end.
    fn check_window(&self, at: usize, count: usize) -> TabulaResult<usize> {
        match at.checked_add(count) {
            Some(end) if end <= self.len => Ok(end),
            _ => Err(TabulaError::range_out_of_bounds(at, count, self.len)),
        }
    }
}

impl<T: Clone> Column<T> {
    /// Clones the run starting at `at` into `destination`.
    ///
    /// The run length is `destination.len()`.
    pub fn get_range(&self, at: usize, destination: &mut [T]) -> TabulaResult<()> {
        let end = self.check_window(at, destination.len())?;
        for (index, (target, slot)) in (at..end).zip(destination.iter_mut().zip(&self.slots[at..end])) {
            *target = slot
                .as_ref()
                .ok_or(TabulaError::VacantSlot { index })?
                .clone();
        }
        Ok(())
    }

    /// Overwrites the run starting at `at` with clones of `source`.
    pub fn set_range(&mut self, at: usize, source: &[T]) -> TabulaResult<()> {
        let end = self.check_window(at, source.len())?;
        for (slot, value) in self.slots[at..end].iter_mut().zip(source) {
            *slot = Some(value.clone());
        }
        Ok(())
    }

    /// Returns the live elements as a vector.
    pub fn to_vec(&self) -> TabulaResult<Vec<T>> {
        self.slots[..self.len]
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.clone().ok_or(TabulaError::VacantSlot { index }))
            .collect()
    }

    /// Returns an independent column with the same name and live elements.
    ///
    /// Spare capacity is not carried over.
    #[must_use]
    pub fn copy(&self) -> Self {
        // capacity_for(len) never exceeds the current capacity.
        let capacity = capacity_for(self.len).unwrap_or(self.capacity());
        let mut slots = Vec::with_capacity(capacity);
        slots.extend_from_slice(&self.slots[..self.len]);
        slots.resize_with(capacity, || None);

        Self {
            name: self.name.clone(),
            slots,
            len: self.len,
        }
    }
}

impl<T: Clone> Clone for Column<T> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("element_type", &type_name::<T>())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T: Element> AnyColumn for Column<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn element_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn expand(&mut self, at: usize, count: usize) -> TabulaResult<()> {
        Column::expand(self, at, count)
    }

    fn shrink(&mut self, at: usize, count: usize) -> TabulaResult<()> {
        Column::shrink(self, at, count)
    }

    fn clear(&mut self) {
        Column::clear(self);
    }

    fn boxed_copy(&self) -> Box<dyn AnyColumn> {
        Box::new(self.copy())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
