//! Metrics collection for dispatch monitoring.

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

// one hour in nanoseconds
const MAX_TRACKED_NS: u64 = 3_600_000_000_000;

/// Dispatch metrics collector
#[derive(Debug)]
pub struct Metrics {
    enabled: AtomicBool,

    // Task counters
    tasks_spawned: AtomicU64,
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,
    tasks_panicked: AtomicU64,

    // Dispatch counters
    dispatches_resolved: AtomicU64,
    dispatches_timed_out: AtomicU64,

    // Task body durations
    task_histogram: RwLock<Histogram<u64>>,
    // Spawn-to-first-completion latency of resolved dispatches
    resolve_histogram: RwLock<Histogram<u64>>,

    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            tasks_spawned: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            dispatches_resolved: AtomicU64::new(0),
            dispatches_timed_out: AtomicU64::new(0),
            task_histogram: RwLock::new(new_histogram()),
            resolve_histogram: RwLock::new(new_histogram()),
            start_time: Instant::now(),
        }
    }

    /// A collector that ignores every record call
    pub fn disabled() -> Self {
        let metrics = Self::new();
        metrics.enabled.store(false, Ordering::Relaxed);
        metrics
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn record_tasks_spawned(&self, count: u64) {
        if self.is_enabled() {
            self.tasks_spawned.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Record a task that returned a value, with its duration
    pub fn record_task_execution(&self, duration_ns: u64) {
        if !self.is_enabled() {
            return;
        }
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);

        // Skip the sample rather than stall a worker on a contended lock
        if let Some(mut hist) = self.task_histogram.try_write() {
            let _ = hist.record(duration_ns.min(MAX_TRACKED_NS));
        }
    }

    /// Record a task that returned an error
    pub fn record_task_failure(&self) {
        if self.is_enabled() {
            self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a recovered task panic
    pub fn record_task_panic(&self) {
        if self.is_enabled() {
            self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_dispatch_resolved(&self, latency_ns: u64) {
        if !self.is_enabled() {
            return;
        }
        self.dispatches_resolved.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .resolve_histogram
            .write()
            .record(latency_ns.min(MAX_TRACKED_NS));
    }

    pub fn record_dispatch_timeout(&self) {
        if self.is_enabled() {
            self.dispatches_timed_out.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let tasks = self.task_histogram.read();
        let resolves = self.resolve_histogram.read();

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_spawned: self.tasks_spawned.load(Ordering::Relaxed),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            dispatches_resolved: self.dispatches_resolved.load(Ordering::Relaxed),
            dispatches_timed_out: self.dispatches_timed_out.load(Ordering::Relaxed),
            avg_task_ns: mean(&tasks),
            p50_task_ns: tasks.value_at_quantile(0.50),
            p99_task_ns: tasks.value_at_quantile(0.99),
            max_task_ns: tasks.max(),
            avg_resolve_ns: mean(&resolves),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.tasks_spawned.store(0, Ordering::Relaxed);
        self.tasks_completed.store(0, Ordering::Relaxed);
        self.tasks_failed.store(0, Ordering::Relaxed);
        self.tasks_panicked.store(0, Ordering::Relaxed);
        self.dispatches_resolved.store(0, Ordering::Relaxed);
        self.dispatches_timed_out.store(0, Ordering::Relaxed);
        self.task_histogram.write().reset();
        self.resolve_histogram.write().reset();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn new_histogram() -> Histogram<u64> {
    Histogram::new_with_max(MAX_TRACKED_NS, 3).expect("Failed to create histogram")
}

fn mean(hist: &Histogram<u64>) -> u64 {
    if hist.len() > 0 {
        hist.mean() as u64
    } else {
        0
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub tasks_spawned: u64,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub tasks_panicked: u64,
    pub dispatches_resolved: u64,
    pub dispatches_timed_out: u64,
    pub avg_task_ns: u64,
    pub p50_task_ns: u64,
    pub p99_task_ns: u64,
    pub max_task_ns: u64,
    pub avg_resolve_ns: u64,
}

impl MetricsSnapshot {
    /// Tasks whose completion has been written, in any form
    pub fn tasks_settled(&self) -> u64 {
        self.tasks_completed + self.tasks_failed + self.tasks_panicked
    }

    /// Fraction of settled dispatches that timed out (0.0 to 1.0)
    pub fn timeout_ratio(&self) -> f64 {
        let total = self.dispatches_resolved + self.dispatches_timed_out;
        if total == 0 {
            return 0.0;
        }
        self.dispatches_timed_out as f64 / total as f64
    }
}
