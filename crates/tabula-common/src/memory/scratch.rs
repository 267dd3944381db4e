//! Pooled scratch buffers for bulk row marshalling.
//!
//! A scratch pool hands out temporary `Vec<T>` buffers of at least a
//! requested capacity. Buffers are pooled per element type so repeated
//! bulk operations over the same row shape stop allocating after warm-up.
//!
//! # Design
//!
//! - One free list per element type, keyed by `TypeId`
//! - A lease is an RAII guard; dropping it hands the buffer back
//! - Buffers are cleared on release, so pooled buffers never keep values alive
//! - Buffers larger than the retention limit are freed instead of pooled

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::mem;
use std::ops::{Deref, DerefMut};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::stats::PoolStats;
use crate::config::ScratchPoolConfig;
use crate::error::{TabulaError, TabulaResult};

type FreeList = Vec<Box<dyn Any + Send>>;

static GLOBAL_POOL: Lazy<ScratchPool> =
    Lazy::new(|| ScratchPool::from_config(ScratchPoolConfig::default()));

/// A pool of reusable, type-segregated scratch buffers.
///
/// # Example
///
/// ```rust
/// use tabula_common::config::ScratchPoolConfig;
/// use tabula_common::memory::ScratchPool;
///
/// let pool = ScratchPool::new(ScratchPoolConfig::default()).unwrap();
///
/// {
///     let mut scratch = pool.lease::<u64>(32);
///     assert!(scratch.capacity() >= 32);
///     scratch.extend([1, 2, 3]);
/// }
///
/// // The buffer came back empty and is reused by the next lease.
/// let scratch = pool.lease::<u64>(8);
/// assert!(scratch.is_empty());
/// assert_eq!(pool.stats().reuses(), 1);
/// ```
pub struct ScratchPool {
    /// Retention limits.
    config: ScratchPoolConfig,
    /// Idle buffers, one list per element type.
    free_lists: Mutex<HashMap<TypeId, FreeList>>,
    /// Lease and release counters.
    stats: PoolStats,
}

impl ScratchPool {
    /// Creates a new pool with the given retention limits.
    pub fn new(config: ScratchPoolConfig) -> TabulaResult<Self> {
        config.validate().map_err(TabulaError::invalid_config)?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: ScratchPoolConfig) -> Self {
        Self {
            config,
            free_lists: Mutex::new(HashMap::new()),
            stats: PoolStats::new(),
        }
    }

    /// Returns the process-wide pool used by wide-row marshalling.
    pub fn global() -> &'static ScratchPool {
        &GLOBAL_POOL
    }

    /// Returns the retention limits of this pool.
    pub fn config(&self) -> &ScratchPoolConfig {
        &self.config
    }

    /// Returns the pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Leases an empty buffer with room for at least `min_capacity` elements.
    ///
    /// The buffer is returned to the pool when the lease is dropped.
    pub fn lease<T: Send + 'static>(&self, min_capacity: usize) -> ScratchBuffer<'_, T> {
        self.stats.record_lease();

        let pooled = {
            let mut free_lists = self.free_lists.lock();
            free_lists
                .get_mut(&TypeId::of::<T>())
                .and_then(Vec::pop)
        };

        let mut buffer = match pooled.and_then(|boxed| boxed.downcast::<Vec<T>>().ok()) {
            Some(buffer) => {
                self.stats.record_reuse();
                *buffer
            }
            None => {
                self.stats.record_allocation();
                Vec::new()
            }
        };

        buffer.reserve(min_capacity);
        trace!(
            element = type_name::<T>(),
            min_capacity,
            capacity = buffer.capacity(),
            "leased scratch buffer"
        );

        ScratchBuffer { pool: self, buffer }
    }

    /// Takes a buffer back, dropping any values it still holds.
    fn release<T: Send + 'static>(&self, mut buffer: Vec<T>) {
        buffer.clear();
        self.stats.record_release();

        let capacity = buffer.capacity();
        if capacity == 0 {
            return;
        }

        if capacity > self.config.max_retained_capacity {
            self.stats.record_discard();
            debug!(
                element = type_name::<T>(),
                capacity,
                limit = self.config.max_retained_capacity,
                "discarding oversized scratch buffer"
            );
            return;
        }

        let mut free_lists = self.free_lists.lock();
        let list = free_lists.entry(TypeId::of::<T>()).or_default();
        if list.len() >= self.config.max_buffers_per_type {
            drop(free_lists);
            self.stats.record_discard();
            debug!(
                element = type_name::<T>(),
                capacity, "scratch free list full, discarding buffer"
            );
            return;
        }

        list.push(Box::new(buffer));
    }

    /// Returns the number of idle buffers held for element type `T`.
    pub fn retained_for<T: 'static>(&self) -> usize {
        self.free_lists
            .lock()
            .get(&TypeId::of::<T>())
            .map_or(0, Vec::len)
    }

    /// Returns the number of idle buffers held across all element types.
    pub fn retained(&self) -> usize {
        self.free_lists.lock().values().map(Vec::len).sum()
    }

    /// Frees every idle buffer.
    ///
    /// Outstanding leases are unaffected and return to the pool as usual.
    pub fn purge(&self) {
        let drained: Vec<FreeList> = self.free_lists.lock().drain().map(|(_, list)| list).collect();
        let freed: usize = drained.iter().map(Vec::len).sum();
        debug!(freed, "purged scratch pool");
    }
}

impl std::fmt::Debug for ScratchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchPool")
            .field("max_buffers_per_type", &self.config.max_buffers_per_type)
            .field("max_retained_capacity", &self.config.max_retained_capacity)
            .field("retained", &self.retained())
            .field("leases", &self.stats.leases())
            .finish()
    }
}

/// A scratch buffer leased from a [`ScratchPool`].
///
/// Dereferences to `Vec<T>`. The buffer starts empty and goes back to the
/// pool, emptied, when the lease is dropped.
pub struct ScratchBuffer<'a, T: Send + 'static> {
    pool: &'a ScratchPool,
    buffer: Vec<T>,
}

impl<T: Send + 'static> ScratchBuffer<'_, T> {
    /// Returns the buffer to its pool now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Send + 'static> Deref for ScratchBuffer<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl<T: Send + 'static> DerefMut for ScratchBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl<T: Send + 'static> Drop for ScratchBuffer<'_, T> {
    fn drop(&mut self) {
        let buffer = mem::take(&mut self.buffer);
        self.pool.release(buffer);
    }
}

impl<T: Send + 'static> std::fmt::Debug for ScratchBuffer<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("element", &type_name::<T>())
            .field("len", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}
