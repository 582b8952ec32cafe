// worker thread stuff
use super::panic_handler::PanicHandler;
use super::task::{Completion, Source, Task};
use crate::telemetry::Metrics;
use crossbeam_channel::Sender;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Everything a worker thread needs besides its task.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub panic_handler: Arc<PanicHandler>,
    pub metrics: Arc<Metrics>,
    pub stack_size: Option<usize>,
}

impl std::fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerContext")
            .field("panic_strategy", &self.panic_handler.strategy())
            .field("stack_size", &self.stack_size)
            .finish()
    }
}

/// Runtime unit executing one task.
///
/// Not retained by the pool: the handle is dropped (thread detached) once
/// spawned, and the worker's only trace afterwards is the completion it
/// writes.
pub(crate) struct WorkerHandle {
    pub source: Source,
    pub thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn spawn<T>(
        ctx: &WorkerContext,
        thread_name: String,
        source: Source,
        task: Task<T>,
        sink: Sender<Completion<T>>,
    ) -> io::Result<Self>
    where
        T: Send + 'static,
    {
        // std panics on interior NUL in a thread name; report it instead
        if thread_name.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "thread name may not contain interior NUL bytes",
            ));
        }

        let mut builder = thread::Builder::new().name(thread_name);
        if let Some(stack_size) = ctx.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let ctx = ctx.clone();
        let worker_source = source.clone();
        let thread = builder.spawn(move || run(ctx, worker_source, task, sink))?;

        Ok(Self { source, thread })
    }

    pub fn detach(self) {
        drop(self.thread);
    }
}

// main body: execute under the fault boundary, then write exactly once
fn run<T>(ctx: WorkerContext, source: Source, task: Task<T>, sink: Sender<Completion<T>>) {
    let start = Instant::now();

    let outcome = ctx
        .panic_handler
        .execute(|| task.run())
        .and_then(|outcome| outcome);

    let elapsed = start.elapsed();

    match &outcome {
        Ok(_) => ctx.metrics.record_task_execution(elapsed.as_nanos() as u64),
        Err(failure) if failure.is_panic() => ctx.metrics.record_task_panic(),
        Err(_) => ctx.metrics.record_task_failure(),
    }

    let completion = Completion {
        source,
        outcome,
        elapsed,
    };

    if let Err(unsent) = sink.send(completion) {
        // reader went away; the result is simply never consumed
        tracing::trace!(source = %unsent.0.source, "completion discarded, receiver dropped");
    } else {
        tracing::trace!(elapsed_us = elapsed.as_micros() as u64, "completion delivered");
    }
}
