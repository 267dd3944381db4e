//! Benchmark utilities and helpers.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Row shape used by the narrow table benchmarks.
pub type NarrowRow = (u64, String, f64);

/// Row shape used by the wide table benchmarks; its tail goes through scratch buffers.
pub type WideRow = (u64, u64, u64, u64, u64, u64, u64, u64, u64, u64, u64, u64);

/// Generates random string data for benchmarks.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates random integer values.
pub fn generate_values(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count).map(|_| rng.gen()).collect()
}

/// Generates random insertion positions for a column growing from `initial_len`.
pub fn generate_positions(count: usize, initial_len: usize) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| rng.gen_range(0..=initial_len + i))
        .collect()
}

/// Generates narrow rows.
pub fn generate_narrow_rows(count: usize) -> Vec<NarrowRow> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count as u64)
        .map(|i| (i, random_string(&mut rng, 12), rng.gen_range(0.0..1000.0)))
        .collect()
}

/// Generates wide rows.
pub fn generate_wide_rows(count: usize) -> Vec<WideRow> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            (
                rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen(),
                rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen(),
            )
        })
        .collect()
}
