//! Task representation and the completion record a worker produces.

use crate::error::{TaskFailure, TaskOutcome};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Position of a task in the sequence submitted to one dispatch.
pub type SourceId = usize;

/// Tag identifying which task produced a completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub id: SourceId,
    pub name: Option<Arc<str>>,
}

impl Source {
    pub(crate) fn new(id: SourceId, name: Option<Arc<str>>) -> Self {
        Self { id, name }
    }

    /// The task's name, or `None` for anonymous tasks.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "#{} ({})", self.id, name),
            None => write!(f, "#{}", self.id),
        }
    }
}

type TaskFn<T> = Box<dyn FnOnce() -> TaskOutcome<T> + Send + 'static>;

/// A unit of independently executable work.
pub struct Task<T> {
    pub(crate) name: Option<Arc<str>>,
    pub(crate) func: TaskFn<T>,
}

impl<T> Task<T> {
    /// Create a task from a closure producing a value
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Task {
            name: None,
            func: Box::new(move || Ok(f())),
        }
    }

    /// Create a task whose `Err` return is reported as `TaskFailure::Failed`
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: fmt::Display,
    {
        Task {
            name: None,
            func: Box::new(move || f().map_err(|e| TaskFailure::Failed(e.to_string()))),
        }
    }

    /// Create a named task; the name tags its completion and its thread
    pub fn named<S, F>(name: S, f: F) -> Self
    where
        S: Into<Arc<str>>,
        F: FnOnce() -> T + Send + 'static,
    {
        Task::new(f).with_name(name)
    }

    pub fn with_name<S: Into<Arc<str>>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run the task body on the current thread.
    ///
    /// Panics are not caught here; the worker wraps this call in the
    /// fault boundary.
    pub(crate) fn run(self) -> TaskOutcome<T> {
        (self.func)()
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish()
    }
}

/// The single value a worker writes for its task.
#[derive(Debug, Clone)]
pub struct Completion<T> {
    pub source: Source,
    pub outcome: TaskOutcome<T>,
    /// Wall time spent in the task body.
    pub elapsed: Duration,
}

impl<T> Completion<T> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn into_value(self) -> TaskOutcome<T> {
        self.outcome
    }
}
