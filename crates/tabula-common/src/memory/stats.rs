//! Scratch pool statistics for monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for scratch pool operations.
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Number of leases handed out.
    leases: AtomicU64,
    /// Leases served from a pooled buffer.
    reuses: AtomicU64,
    /// Leases that had to allocate a fresh buffer.
    allocations: AtomicU64,
    /// Buffers handed back to the pool.
    releases: AtomicU64,
    /// Released buffers that were freed instead of retained.
    discards: AtomicU64,
}

impl PoolStats {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lease.
    #[inline]
    pub fn record_lease(&self) {
        self.leases.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lease served from the pool.
    #[inline]
    pub fn record_reuse(&self) {
        self.reuses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lease that allocated.
    #[inline]
    pub fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a release.
    #[inline]
    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a released buffer that was freed.
    #[inline]
    pub fn record_discard(&self) {
        self.discards.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns total leases.
    pub fn leases(&self) -> u64 {
        self.leases.load(Ordering::Relaxed)
    }

    /// Returns leases served from the pool.
    pub fn reuses(&self) -> u64 {
        self.reuses.load(Ordering::Relaxed)
    }

    /// Returns leases that allocated.
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Returns releases.
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Returns discarded buffers.
    pub fn discards(&self) -> u64 {
        self.discards.load(Ordering::Relaxed)
    }

    /// Returns leases currently outstanding.
    pub fn outstanding(&self) -> u64 {
        self.leases().saturating_sub(self.releases())
    }

    /// Returns the reuse ratio (0.0 to 1.0).
    pub fn reuse_ratio(&self) -> f64 {
        let leases = self.leases();
        if leases == 0 {
            0.0
        } else {
            self.reuses() as f64 / leases as f64
        }
    }

    /// Resets all statistics.
    pub fn reset(&self) {
        self.leases.store(0, Ordering::Relaxed);
        self.reuses.store(0, Ordering::Relaxed);
        self.allocations.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
        self.discards.store(0, Ordering::Relaxed);
    }
}

impl Clone for PoolStats {
    fn clone(&self) -> Self {
        Self {
            leases: AtomicU64::new(self.leases()),
            reuses: AtomicU64::new(self.reuses()),
            allocations: AtomicU64::new(self.allocations()),
            releases: AtomicU64::new(self.releases()),
            discards: AtomicU64::new(self.discards()),
        }
    }
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PoolStats {{ leases: {}, reuses: {}, reuse_ratio: {:.2}%, allocations: {}, releases: {}, discards: {} }}",
            self.leases(),
            self.reuses(),
            self.reuse_ratio() * 100.0,
            self.allocations(),
            self.releases(),
            self.discards()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = PoolStats::new();

        stats.record_lease();
        stats.record_allocation();
        stats.record_lease();
        stats.record_reuse();
        stats.record_release();

        assert_eq!(stats.leases(), 2);
        assert_eq!(stats.reuses(), 1);
        assert_eq!(stats.allocations(), 1);
        assert_eq!(stats.outstanding(), 1);
        assert!((stats.reuse_ratio() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_stats_reset() {
        let stats = PoolStats::new();
        stats.record_lease();
        stats.record_discard();

        stats.reset();

        assert_eq!(stats.leases(), 0);
        assert_eq!(stats.discards(), 0);
        assert_eq!(stats.reuse_ratio(), 0.0);
    }

    #[test]
    fn test_stats_clone_and_display() {
        let stats = PoolStats::new();
        stats.record_lease();
        stats.record_reuse();

        let snapshot = stats.clone();
        stats.record_lease();

        assert_eq!(snapshot.leases(), 1);
        assert!(snapshot.to_string().contains("reuse_ratio: 100.00%"));
    }
}
