//! Trace counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every trace issued through one tracer.
///
/// Each trace counts locally and publishes once, so parallel pixel tasks
/// touch the atomics once per ray rather than once per triangle.
#[derive(Debug, Default)]
pub struct TraceStats {
    rays: AtomicU64,
    triangle_tests: AtomicU64,
    volumes_culled: AtomicU64,
}

/// Point-in-time copy of [`TraceStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceCounts {
    pub rays: u64,
    pub triangle_tests: u64,
    pub volumes_culled: u64,
}

impl TraceStats {
    pub(crate) fn record(&self, triangle_tests: u64, volumes_culled: u64) {
        self.rays.fetch_add(1, Ordering::Relaxed);
        self.triangle_tests.fetch_add(triangle_tests, Ordering::Relaxed);
        self.volumes_culled.fetch_add(volumes_culled, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TraceCounts {
        TraceCounts {
            rays: self.rays.load(Ordering::Relaxed),
            triangle_tests: self.triangle_tests.load(Ordering::Relaxed),
            volumes_culled: self.volumes_culled.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.rays.store(0, Ordering::Relaxed);
        self.triangle_tests.store(0, Ordering::Relaxed);
        self.volumes_culled.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let stats = TraceStats::default();
        stats.record(3, 1);
        stats.record(2, 0);

        assert_eq!(
            stats.snapshot(),
            TraceCounts {
                rays: 2,
                triangle_tests: 5,
                volumes_culled: 1,
            }
        );

        stats.reset();
        assert_eq!(stats.snapshot(), TraceCounts::default());
    }
}
