//! Call and failover statistics.
//!
//! Counters are updated lock-free and can be read at any time through
//! [`StatsTracker::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Statistics tracker shared by all clones of a client.
#[derive(Debug)]
pub struct StatsTracker {
    start_time: Instant,
    calls: AtomicU64,
    success_count: AtomicU64,
    failed_attempts: AtomicU64,
    failovers: AtomicU64,
    failovers_succeeded: AtomicU64,
    exhausted: AtomicU64,
}

impl StatsTracker {
    /// Create a new statistics tracker.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            calls: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            failovers: AtomicU64::new(0),
            failovers_succeeded: AtomicU64::new(0),
            exhausted: AtomicU64::new(0),
        }
    }

    /// Record the start of a logical call.
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call that returned a response.
    pub fn record_success(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one failed attempt against the selected host.
    pub fn record_failed_attempt(&self) {
        self.failed_attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failover and whether it found a live host.
    pub fn record_failover(&self, found: bool) {
        self.failovers.fetch_add(1, Ordering::Relaxed);
        if found {
            self.failovers_succeeded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a call that hit the retry ceiling.
    pub fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            elapsed: self.start_time.elapsed(),
            calls: self.calls.load(Ordering::Relaxed),
            success_count: self.success_count.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            failovers: self.failovers.load(Ordering::Relaxed),
            failovers_succeeded: self.failovers_succeeded.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of current statistics.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// Elapsed time since the client was built.
    pub elapsed: Duration,
    /// Logical calls started.
    pub calls: u64,
    /// Calls that returned a response.
    pub success_count: u64,
    /// Individual attempts that failed.
    pub failed_attempts: u64,
    /// Failovers performed.
    pub failovers: u64,
    /// Failovers that found a live host.
    pub failovers_succeeded: u64,
    /// Calls that gave up at the retry ceiling.
    pub exhausted: u64,
}

impl StatsSnapshot {
    /// Get the success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.calls > 0 {
            (self.success_count as f64 / self.calls as f64) * 100.0
        } else {
            100.0
        }
    }

    /// Format as a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Calls: {} | Success: {} ({:.1}%) | Failed attempts: {} | Failovers: {}/{} | Exhausted: {}",
            self.calls,
            self.success_count,
            self.success_rate(),
            self.failed_attempts,
            self.failovers_succeeded,
            self.failovers,
            self.exhausted
        )
    }
}
