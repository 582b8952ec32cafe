use super::channel::ResultChannel;
use super::panic_handler::PanicHandler;
use super::task::{Completion, Source, Task};
use super::worker::{WorkerContext, WorkerHandle};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::select::Dispatch;
use crate::telemetry::Metrics;
use crossbeam_channel::{unbounded, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Runs a fixed list of independent tasks, one OS thread per task.
///
/// Spawning never waits on task execution. Workers are detached: once
/// spawned they run to completion whether or not anyone reads their result.
#[derive(Debug)]
pub struct WorkerPool {
    thread_name_prefix: String,
    max_tasks: usize,
    ctx: WorkerContext,
    next_dispatch: AtomicU64,
}

impl WorkerPool {
    pub fn new(config: &Config, panic_handler: Arc<PanicHandler>, metrics: Arc<Metrics>) -> Self {
        Self {
            thread_name_prefix: config.thread_name_prefix.clone(),
            max_tasks: config.max_tasks,
            ctx: WorkerContext {
                panic_handler,
                metrics,
                stack_size: config.stack_size,
            },
            next_dispatch: AtomicU64::new(1),
        }
    }

    /// Spawn every task, fanning all completions into one shared channel.
    pub fn spawn_all<T>(&self, tasks: Vec<Task<T>>) -> Result<Dispatch<T>>
    where
        T: Send + 'static,
    {
        self.check_len(tasks.len())?;
        let dispatch_id = self.next_dispatch.fetch_add(1, Ordering::Relaxed);

        let (tx, rx) = unbounded();
        let spawned = tasks.len();
        self.spawn_with(dispatch_id, tasks, |_| tx.clone())?;
        // only workers hold senders from here on
        drop(tx);

        tracing::debug!(dispatch = dispatch_id, workers = spawned, "dispatch spawned");
        Ok(Dispatch::new(
            dispatch_id,
            rx,
            spawned,
            self.ctx.metrics.clone(),
        ))
    }

    /// Spawn every task, each reporting into its own `ResultChannel`.
    pub fn spawn_each<T>(&self, tasks: Vec<Task<T>>) -> Result<Vec<ResultChannel<T>>>
    where
        T: Send + 'static,
    {
        self.check_len(tasks.len())?;
        let dispatch_id = self.next_dispatch.fetch_add(1, Ordering::Relaxed);

        let mut channels = Vec::with_capacity(tasks.len());
        self.spawn_with(dispatch_id, tasks, |source| {
            let (tx, channel) = ResultChannel::new(source.clone());
            channels.push(channel);
            tx
        })?;

        tracing::debug!(dispatch = dispatch_id, workers = channels.len(), "dispatch spawned");
        Ok(channels)
    }

    /// Fire-and-forget a single task. The returned channel may be ignored.
    pub fn spawn_detached<T>(&self, task: Task<T>) -> Result<ResultChannel<T>>
    where
        T: Send + 'static,
    {
        let mut channels = self.spawn_each(vec![task])?;
        channels.pop().ok_or(Error::NoTasks)
    }

    fn check_len(&self, requested: usize) -> Result<()> {
        if requested > self.max_tasks {
            return Err(Error::TooManyTasks {
                requested,
                limit: self.max_tasks,
            });
        }
        Ok(())
    }

    fn spawn_with<T, S>(&self, dispatch_id: u64, tasks: Vec<Task<T>>, mut sink_for: S) -> Result<()>
    where
        T: Send + 'static,
        S: FnMut(&Source) -> Sender<Completion<T>>,
    {
        for (id, task) in tasks.into_iter().enumerate() {
            let source = Source::new(id, task.name.clone());
            let name = match source.name() {
                Some(task_name) => format!("{}-{}-{}", self.thread_name_prefix, dispatch_id, task_name),
                None => format!("{}-{}-{}", self.thread_name_prefix, dispatch_id, id),
            };

            let sink = sink_for(&source);
            let handle = WorkerHandle::spawn(&self.ctx, name, source, task, sink).map_err(|error| {
                tracing::error!(dispatch = dispatch_id, source = id, %error, "worker spawn failed");
                Error::Spawn {
                    source_id: id,
                    error,
                }
            })?;

            self.ctx.metrics.record_tasks_spawned(1);
            tracing::trace!(dispatch = dispatch_id, source = %handle.source, "worker started");
            handle.detach();
        }

        Ok(())
    }
}
