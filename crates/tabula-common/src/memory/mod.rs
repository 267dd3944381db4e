//! Memory management utilities for tabula.
//!
//! - **Scratch pool**: pooled, scoped temporary buffers keyed by element
//!   type, used to marshal row fragments during bulk column reads and writes
//! - **Pool statistics**: lease/reuse counters for the scratch pool
//!
//! # Design Principles
//!
//! 1. **Scoped ownership**: a leased buffer is exclusively owned and goes
//!    back to its pool when dropped, on every exit path
//! 2. **No stale ownership**: buffers are cleared before they are pooled
//! 3. **Bounded retention**: oversized or surplus buffers are freed

mod scratch;
mod stats;

pub use scratch::{ScratchBuffer, ScratchPool};
pub use stats::PoolStats;
