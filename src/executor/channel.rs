// per-task result conduit
use super::task::{Completion, Source};
use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Single-producer, single-consumer conduit carrying one task's completion.
#[derive(Debug)]
pub struct ResultChannel<T> {
    source: Source,
    rx: Receiver<Completion<T>>,
    consumed: bool,
}

impl<T> ResultChannel<T> {
    pub(crate) fn new(source: Source) -> (Sender<Completion<T>>, Self) {
        // one slot: the single write never blocks the worker
        let (tx, rx) = bounded(1);
        (
            tx,
            Self {
                source,
                rx,
                consumed: false,
            },
        )
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Whether the completion has already been read from this channel.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Block until the worker reports.
    pub fn recv(&mut self) -> Result<Completion<T>> {
        self.ensure_pending()?;
        let completion = self.rx.recv().map_err(|_| Error::Disconnected)?;
        self.consumed = true;
        Ok(completion)
    }

    /// Block for at most `timeout`; `Ok(None)` when it elapses first.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Completion<T>>> {
        self.ensure_pending()?;
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.consumed = true;
                Ok(Some(completion))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }

    /// Non-blocking read; `Ok(None)` while the worker is still running.
    pub fn try_recv(&mut self) -> Result<Option<Completion<T>>> {
        self.ensure_pending()?;
        match self.rx.try_recv() {
            Ok(completion) => {
                self.consumed = true;
                Ok(Some(completion))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::Disconnected),
        }
    }

    pub(crate) fn receiver(&self) -> &Receiver<Completion<T>> {
        &self.rx
    }

    pub(crate) fn mark_consumed(&mut self) {
        self.consumed = true;
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.consumed {
            Err(Error::NoPendingChannels)
        } else {
            Ok(())
        }
    }
}
