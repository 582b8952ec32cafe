use crate::config::Config;
use crate::error::Result;
use crate::executor::{PanicHandler, ResultChannel, Task, WorkerPool};
use crate::select::{Dispatch, DispatchOutcome};
use crate::telemetry::{Metrics, MetricsSnapshot};
use std::sync::Arc;
use std::time::Duration;

/// Entry point for fanning out work and racing it.
///
/// Constructed explicitly and passed by reference (or `Arc`) to whatever
/// layer submits work; nothing about it is process-global.
#[derive(Debug)]
pub struct Dispatcher {
    pool: WorkerPool,
    panic_handler: Arc<PanicHandler>,
    metrics: Arc<Metrics>,
    config: Config,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));
        let metrics = Arc::new(if config.telemetry_enabled() {
            Metrics::new()
        } else {
            Metrics::disabled()
        });
        let pool = WorkerPool::new(&config, panic_handler.clone(), metrics.clone());

        Ok(Self {
            pool,
            panic_handler,
            metrics,
            config,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Spawn all tasks into one fan-in dispatch without waiting.
    pub fn spawn<T>(&self, tasks: Vec<Task<T>>) -> Result<Dispatch<T>>
    where
        T: Send + 'static,
    {
        self.pool.spawn_all(tasks)
    }

    /// Spawn all tasks, one `ResultChannel` each.
    pub fn spawn_each<T>(&self, tasks: Vec<Task<T>>) -> Result<Vec<ResultChannel<T>>>
    where
        T: Send + 'static,
    {
        self.pool.spawn_each(tasks)
    }

    /// Run one task in the background; its channel may be dropped unread.
    pub fn spawn_detached<T>(&self, task: Task<T>) -> Result<ResultChannel<T>>
    where
        T: Send + 'static,
    {
        self.pool.spawn_detached(task)
    }

    /// Spawn all tasks and return the first completion, or `TimedOut`.
    ///
    /// `timeout` falls back to `Config::default_timeout`; with neither set
    /// the call blocks until some task reports. Workers that lose the race
    /// keep running and their results are discarded.
    pub fn dispatch<T>(
        &self,
        tasks: Vec<Task<T>>,
        timeout: Option<Duration>,
    ) -> Result<DispatchOutcome<T>>
    where
        T: Send + 'static,
    {
        let mut dispatch = self.spawn(tasks)?;
        dispatch.select(timeout.or(self.config.default_timeout))
    }

    pub fn panic_count(&self) -> usize {
        self.panic_handler.panic_count()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TaskFailure};
    use crate::executor::PanicStrategy;
    use std::thread;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Config::builder()
                .panic_strategy(PanicStrategy::Isolate)
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_dispatch_returns_first() {
        let dispatcher = dispatcher();

        let outcome = dispatcher
            .dispatch(
                vec![
                    Task::named("slow", || {
                        thread::sleep(Duration::from_millis(400));
                        "slow"
                    }),
                    Task::named("fast", || "fast"),
                ],
                Some(Duration::from_secs(5)),
            )
            .unwrap();

        let completion = outcome.completion().unwrap();
        assert_eq!(completion.source.id, 1);
        assert_eq!(completion.source.name(), Some("fast"));
        assert_eq!(completion.outcome, Ok("fast"));
    }

    #[test]
    fn test_default_timeout_applies() {
        let dispatcher = Dispatcher::new(
            Config::builder()
                .default_timeout(Duration::from_millis(30))
                .build()
                .unwrap(),
        )
        .unwrap();

        let outcome = dispatcher
            .dispatch(
                vec![Task::new(|| thread::sleep(Duration::from_millis(300)))],
                None,
            )
            .unwrap();
        assert!(outcome.is_timed_out());
        #[cfg(feature = "telemetry")]
        assert_eq!(dispatcher.metrics().dispatches_timed_out, 1);
    }

    #[test]
    fn test_failure_marker_resolves_dispatch() {
        let dispatcher = dispatcher();

        let outcome = dispatcher
            .dispatch(vec![Task::<i32>::new(|| panic!("worker fault"))], None)
            .unwrap();

        let completion = outcome.completion().unwrap();
        assert!(matches!(
            completion.outcome,
            Err(TaskFailure::Panicked { ref message }) if message == "worker fault"
        ));
        assert_eq!(dispatcher.panic_count(), 1);
    }

    #[test]
    fn test_empty_dispatch_is_an_error() {
        let dispatcher = dispatcher();
        let result = dispatcher.dispatch(Vec::<Task<()>>::new(), None);
        assert!(matches!(result, Err(Error::NoTasks)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.max_tasks = 0;
        assert!(matches!(Dispatcher::new(config), Err(Error::Config(_))));
    }
}
