//! Dispatch metrics.
//!
//! Counters and a latency histogram for spawned tasks and settled
//! dispatches. Without the `telemetry` feature a no-op stub with the same
//! surface is compiled instead.

#[cfg(feature = "telemetry")]
pub mod metrics;

#[cfg(feature = "telemetry")]
pub use metrics::{Metrics, MetricsSnapshot};

// Stub implementations when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub mod metrics {
    use std::time::Duration;

    #[derive(Debug, Clone, Default)]
    pub struct Metrics;

    impl Metrics {
        pub fn new() -> Self {
            Self
        }

        pub fn disabled() -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn record_tasks_spawned(&self, _count: u64) {}

        pub fn record_task_execution(&self, _duration_ns: u64) {}

        pub fn record_task_failure(&self) {}

        pub fn record_task_panic(&self) {}

        pub fn record_dispatch_resolved(&self, _latency_ns: u64) {}

        pub fn record_dispatch_timeout(&self) {}

        pub fn snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot::default()
        }

        pub fn reset(&self) {}
    }

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
}

#[cfg(not(feature = "telemetry"))]
pub use metrics::{Metrics, MetricsSnapshot};
