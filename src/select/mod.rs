//! Selective wait over the results of one dispatch.
//!
//! The primary path is fan-in: every worker of a dispatch writes a
//! source-tagged completion to one shared channel, and the selector does a
//! single (optionally timed) read on it. Callers holding per-task
//! `ResultChannel`s can instead wait on the whole set with
//! [`selector::first_ready_of`].

pub mod dispatch;
pub mod selector;

pub use dispatch::Dispatch;
pub use selector::{first_ready, first_ready_of};

use crate::executor::Completion;

/// Lifecycle of one dispatch. `Resolved` and `TimedOut` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Workers spawned, no result observed yet.
    Pending,
    /// One completion was read by the selector.
    Resolved,
    /// The deadline passed before any completion arrived.
    TimedOut,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DispatchState::Pending)
    }
}

/// What a select returns to its caller.
#[derive(Debug, Clone)]
pub enum DispatchOutcome<T> {
    /// First completion to arrive, tagged with its source. The outcome
    /// inside may itself be a `TaskFailure`.
    Resolved(Completion<T>),
    /// No completion arrived within the deadline.
    TimedOut,
}

impl<T> DispatchOutcome<T> {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, DispatchOutcome::TimedOut)
    }

    pub fn completion(self) -> Option<Completion<T>> {
        match self {
            DispatchOutcome::Resolved(completion) => Some(completion),
            DispatchOutcome::TimedOut => None,
        }
    }

    pub(crate) fn state(&self) -> DispatchState {
        match self {
            DispatchOutcome::Resolved(_) => DispatchState::Resolved,
            DispatchOutcome::TimedOut => DispatchState::TimedOut,
        }
    }
}
