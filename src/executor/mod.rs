//! Task execution infrastructure.
//!
//! This module provides the worker side of a dispatch: tasks, the fault
//! boundary each one runs behind, the thread that runs it, and the
//! channel its completion is written to.

pub mod channel;
pub mod panic_handler;
pub mod task;
pub(crate) mod worker;
pub mod worker_pool;

pub use channel::ResultChannel;
pub use panic_handler::{recover, PanicHandler, PanicStrategy};
pub use task::{Completion, Source, SourceId, Task};
pub use worker_pool::WorkerPool;
