use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabula_frame::{Row, Table, TabulaResult};

/// Default seed for reproducible workloads.
pub const DEFAULT_SEED: u64 = 42;

/// Generates `(id, name, score)` rows with sequential ids.
pub fn generate_person_rows(count: usize, seed: u64) -> Vec<(u32, String, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let names = [
        "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry",
    ];

    (0..count as u32)
        .map(|i| {
            let name = format!("{}_{}", names[rng.gen_range(0..names.len())], rng.gen_range(0..10000));
            let score = f64::from(rng.gen_range(0..1000u32)) / 10.0;
            (i + 1, name, score)
        })
        .collect()
}

/// One mutation of a table or of its reference model.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<R> {
    /// Insert rows at an index.
    Insert(usize, Vec<R>),
    /// Remove a run of rows.
    Remove(usize, usize),
    /// Overwrite one row.
    Set(usize, R),
    /// Remove every row.
    Clear,
}

impl<R: Row + Clone> Operation<R> {
    /// Applies the operation to a table.
    pub fn apply(&self, table: &mut Table<R>) -> TabulaResult<()> {
        match self {
            Self::Insert(at, rows) => table.insert_range(*at, rows.iter().cloned()),
            Self::Remove(at, count) => table.remove_range(*at, *count),
            Self::Set(at, row) => table.set(*at, row.clone()),
            Self::Clear => {
                table.clear();
                Ok(())
            }
        }
    }

    /// Applies the operation to a `Vec` reference model.
    pub fn apply_to_reference(&self, reference: &mut Vec<R>) {
        match self {
            Self::Insert(at, rows) => {
                reference.splice(*at..*at, rows.iter().cloned());
            }
            Self::Remove(at, count) => {
                reference.drain(*at..*at + *count);
            }
            Self::Set(at, row) => reference[*at] = row.clone(),
            Self::Clear => reference.clear(),
        }
    }
}

/// Seeded generator of valid operation sequences.
///
/// Tracks the length the target will have after each generated operation,
/// so every index it produces is in range.
pub struct WorkloadGenerator<F> {
    rng: StdRng,
    len: usize,
    make_row: F,
}

impl<R, F> WorkloadGenerator<F>
where
    F: FnMut(&mut StdRng) -> R,
{
    /// Creates a generator for an initially empty target.
    pub fn new(seed: u64, make_row: F) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            len: 0,
            make_row,
        }
    }

    /// Returns the target length after the operations generated so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the target is empty after the operations so far.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Generates the next operation.
    pub fn next_operation(&mut self) -> Operation<R> {
        let roll = self.rng.gen_range(0..100);
        if self.len == 0 || roll < 50 {
            let at = self.rng.gen_range(0..=self.len);
            let count = self.rng.gen_range(1..=32);
            let rows = (0..count).map(|_| (self.make_row)(&mut self.rng)).collect();
            self.len += count;
            Operation::Insert(at, rows)
        } else if roll < 80 {
            let at = self.rng.gen_range(0..self.len);
            let count = self.rng.gen_range(0..=(self.len - at).min(16));
            self.len -= count;
            Operation::Remove(at, count)
        } else if roll < 98 {
            let at = self.rng.gen_range(0..self.len);
            Operation::Set(at, (self.make_row)(&mut self.rng))
        } else {
            self.len = 0;
            Operation::Clear
        }
    }

    /// Generates `count` operations.
    pub fn operations(&mut self, count: usize) -> Vec<Operation<R>> {
        (0..count).map(|_| self.next_operation()).collect()
    }
}
