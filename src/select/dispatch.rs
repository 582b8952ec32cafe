use super::selector::first_ready;
use super::{DispatchOutcome, DispatchState};
use crate::error::{Error, Result};
use crate::executor::Completion;
use crate::telemetry::Metrics;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The workers spawned by one fan-in dispatch and the channel they share.
///
/// `select` may run once; afterwards the dispatch stays `Resolved` or
/// `TimedOut`. Completions that were not selected are not lost: `recv` and
/// `join_all` read them later.
#[derive(Debug)]
pub struct Dispatch<T> {
    id: u64,
    rx: Receiver<Completion<T>>,
    spawned: usize,
    received: usize,
    state: DispatchState,
    started: Instant,
    metrics: Arc<Metrics>,
}

impl<T> Dispatch<T> {
    pub(crate) fn new(
        id: u64,
        rx: Receiver<Completion<T>>,
        spawned: usize,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            id,
            rx,
            spawned,
            received: 0,
            state: DispatchState::Pending,
            started: Instant::now(),
            metrics,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of workers spawned.
    pub fn len(&self) -> usize {
        self.spawned
    }

    pub fn is_empty(&self) -> bool {
        self.spawned == 0
    }

    /// Completions not yet read.
    pub fn outstanding(&self) -> usize {
        self.spawned - self.received
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Wait for the first completion, or until `timeout` elapses.
    pub fn select(&mut self, timeout: Option<Duration>) -> Result<DispatchOutcome<T>> {
        if self.state.is_terminal() {
            return Err(Error::AlreadySettled(self.state));
        }
        if self.is_empty() {
            return Err(Error::NoTasks);
        }

        let outcome = first_ready(&self.rx, timeout)?;
        self.state = outcome.state();

        match &outcome {
            DispatchOutcome::Resolved(completion) => {
                self.received += 1;
                self.metrics
                    .record_dispatch_resolved(self.started.elapsed().as_nanos() as u64);
                tracing::debug!(
                    dispatch = self.id,
                    source = %completion.source,
                    ok = completion.is_ok(),
                    "dispatch resolved"
                );
            }
            DispatchOutcome::TimedOut => {
                self.metrics.record_dispatch_timeout();
                tracing::debug!(dispatch = self.id, ?timeout, "dispatch timed out");
            }
        }

        Ok(outcome)
    }

    /// Read the next unread completion, whatever the state.
    ///
    /// Returns `None` when nothing is outstanding or `timeout` elapses.
    pub fn recv(&mut self, timeout: Option<Duration>) -> Option<Completion<T>> {
        if self.outstanding() == 0 {
            return None;
        }

        let completion = match timeout {
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(completion) => completion,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            },
            None => self.rx.recv().ok()?,
        };

        self.received += 1;
        Some(completion)
    }

    /// Block until every outstanding completion is read.
    ///
    /// Results come back ordered by source id.
    pub fn join_all(mut self) -> Vec<Completion<T>> {
        let mut completions = Vec::with_capacity(self.outstanding());
        while let Some(completion) = self.recv(None) {
            completions.push(completion);
        }
        completions.sort_by_key(|c| c.source.id);
        completions
    }
}
