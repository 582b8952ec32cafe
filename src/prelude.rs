pub use crate::config::{Config, ConfigBuilder};
pub use crate::dispatcher::Dispatcher;
pub use crate::error::{Error, Result, TaskFailure, TaskOutcome};
pub use crate::executor::{recover, Completion, PanicStrategy, ResultChannel, Source, Task};
pub use crate::select::{first_ready_of, Dispatch, DispatchOutcome, DispatchState};
pub use crate::telemetry::MetricsSnapshot;
