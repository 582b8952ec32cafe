use crate::select::DispatchState;
use crate::executor::task::SourceId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("too many tasks: {requested} requested, limit is {limit}")]
    TooManyTasks { requested: usize, limit: usize },

    #[error("nothing to select on: no tasks were submitted")]
    NoTasks,

    #[error("every result channel has already been consumed")]
    NoPendingChannels,

    #[error("failed to spawn worker for source {source_id}: {error}")]
    Spawn {
        source_id: SourceId,
        #[source]
        error: std::io::Error,
    },

    #[error("dispatch already settled ({0:?})")]
    AlreadySettled(DispatchState),

    #[error("result channel closed without a value")]
    Disconnected,
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}

/// Failure marker written in place of a task's value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskFailure {
    /// The task body panicked and the panic was recovered by the worker.
    #[error("task panicked: {message}")]
    Panicked { message: String },

    /// The task body returned an error.
    #[error("task failed: {0}")]
    Failed(String),
}

impl TaskFailure {
    pub fn is_panic(&self) -> bool {
        matches!(self, TaskFailure::Panicked { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            TaskFailure::Panicked { message } => message,
            TaskFailure::Failed(message) => message,
        }
    }
}

pub type TaskOutcome<T> = std::result::Result<T, TaskFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TooManyTasks {
            requested: 10,
            limit: 4,
        };
        assert_eq!(err.to_string(), "too many tasks: 10 requested, limit is 4");

        let err = Error::AlreadySettled(DispatchState::TimedOut);
        assert_eq!(err.to_string(), "dispatch already settled (TimedOut)");
    }

    #[test]
    fn test_task_failure_message() {
        let failure = TaskFailure::Panicked {
            message: "division by zero".to_string(),
        };
        assert!(failure.is_panic());
        assert_eq!(failure.message(), "division by zero");
        assert_eq!(failure.to_string(), "task panicked: division by zero");

        let failure = TaskFailure::Failed("bad input".to_string());
        assert!(!failure.is_panic());
        assert_eq!(failure.to_string(), "task failed: bad input");
    }
}
