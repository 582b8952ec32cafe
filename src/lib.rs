//! fanrace - fan out, contain, race
//!
//! A small concurrency core: run a bounded set of independent tasks on
//! their own threads, keep a panicking task from taking anything else down,
//! and hand the caller whichever result arrives first.
//!
//! # Quick Start
//!
//! ```no_run
//! use fanrace::prelude::*;
//! use std::time::Duration;
//!
//! let dispatcher = Dispatcher::with_defaults().unwrap();
//!
//! let outcome = dispatcher
//!     .dispatch(
//!         vec![
//!             Task::named("primary", || {
//!                 std::thread::sleep(Duration::from_millis(300));
//!                 "from primary"
//!             }),
//!             Task::named("mirror", || {
//!                 std::thread::sleep(Duration::from_millis(600));
//!                 "from mirror"
//!             }),
//!         ],
//!         Some(Duration::from_secs(1)),
//!     )
//!     .unwrap();
//!
//! match outcome {
//!     DispatchOutcome::Resolved(completion) => {
//!         println!("{} answered: {:?}", completion.source, completion.outcome)
//!     }
//!     DispatchOutcome::TimedOut => println!("nobody answered in time"),
//! }
//! ```
//!
//! # Features
//!
//! - **Fault isolation**: task panics become `TaskFailure` values, never
//!   unwinding across the thread boundary
//! - **Fan-in select**: all workers of a dispatch report into one
//!   source-tagged channel; the first read wins
//! - **Per-task channels**: `spawn_each` + `first_ready_of` when the caller
//!   wants one conduit per task
//! - **Telemetry**: task and dispatch counters with latency histograms
//!   (optional, on by default)

// Lint configuration
#![warn(missing_debug_implementations)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod select;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result, TaskFailure, TaskOutcome};
pub use executor::{recover, Completion, PanicStrategy, ResultChannel, Source, SourceId, Task};
pub use select::{Dispatch, DispatchOutcome, DispatchState};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_basic_dispatch() {
        let dispatcher = Dispatcher::with_defaults().unwrap();

        let outcome = dispatcher
            .dispatch(vec![Task::new(|| 2 + 2)], Some(Duration::from_secs(2)))
            .unwrap();

        assert_eq!(outcome.completion().unwrap().outcome, Ok(4));
    }

    #[test]
    fn test_join_all_collects_everything() {
        let dispatcher = Dispatcher::with_defaults().unwrap();

        let tasks: Vec<Task<usize>> = (0..10).map(|i| Task::new(move || i * i)).collect();
        let completions = dispatcher.spawn(tasks).unwrap().join_all();

        assert_eq!(completions.len(), 10);
        for (i, completion) in completions.iter().enumerate() {
            assert_eq!(completion.source.id, i);
            assert_eq!(completion.outcome, Ok(i * i));
        }
    }
}
