use super::DispatchOutcome;
use crate::error::{Error, Result};
use crate::executor::{Completion, ResultChannel};
use crossbeam_channel::{Receiver, RecvTimeoutError, Select};
use std::time::Duration;

/// Block until the fan-in channel yields a completion or `timeout` elapses.
///
/// With `timeout == None` this waits indefinitely; a worker whose task never
/// returns then blocks the caller forever.
pub fn first_ready<T>(
    rx: &Receiver<Completion<T>>,
    timeout: Option<Duration>,
) -> Result<DispatchOutcome<T>> {
    let completion = match timeout {
        Some(timeout) => match rx.recv_timeout(timeout) {
            Ok(completion) => completion,
            Err(RecvTimeoutError::Timeout) => return Ok(DispatchOutcome::TimedOut),
            Err(RecvTimeoutError::Disconnected) => return Err(Error::Disconnected),
        },
        None => rx.recv().map_err(|_| Error::Disconnected)?,
    };

    Ok(DispatchOutcome::Resolved(completion))
}

/// Wait on every unconsumed channel at once and take the first completion.
///
/// Channels already read are skipped. When several are ready together the
/// choice among them is random.
pub fn first_ready_of<T>(
    channels: &mut [ResultChannel<T>],
    timeout: Option<Duration>,
) -> Result<DispatchOutcome<T>> {
    if channels.is_empty() {
        return Err(Error::NoTasks);
    }

    let pending: Vec<usize> = channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| !channel.is_consumed())
        .map(|(idx, _)| idx)
        .collect();

    if pending.is_empty() {
        return Err(Error::NoPendingChannels);
    }

    let (slot, received) = {
        let mut sel = Select::new();
        for &idx in &pending {
            sel.recv(channels[idx].receiver());
        }

        let oper = match timeout {
            Some(timeout) => match sel.select_timeout(timeout) {
                Ok(oper) => oper,
                Err(_) => return Ok(DispatchOutcome::TimedOut),
            },
            None => sel.select(),
        };

        let slot = pending[oper.index()];
        let received = oper.recv(channels[slot].receiver());
        (slot, received)
    };

    channels[slot].mark_consumed();
    let completion = received.map_err(|_| Error::Disconnected)?;
    Ok(DispatchOutcome::Resolved(completion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::task::Source;
    use crossbeam_channel::unbounded;
    use std::thread;

    #[test]
    fn test_first_ready_times_out() {
        let (_tx, rx) = unbounded::<Completion<i32>>();
        let outcome = first_ready(&rx, Some(Duration::from_millis(20))).unwrap();
        assert!(outcome.is_timed_out());
    }

    #[test]
    fn test_first_ready_disconnected() {
        let (tx, rx) = unbounded::<Completion<i32>>();
        drop(tx);
        assert!(matches!(first_ready(&rx, None), Err(Error::Disconnected)));
    }

    #[test]
    fn test_first_ready_of_picks_the_written_channel() {
        let (_tx_a, chan_a) = ResultChannel::<&str>::new(Source::new(0, None));
        let (tx_b, chan_b) = ResultChannel::<&str>::new(Source::new(1, None));
        let mut channels = vec![chan_a, chan_b];

        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            let _ = tx_b.send(Completion {
                source: Source::new(1, None),
                outcome: Ok("b"),
                elapsed: Duration::ZERO,
            });
        });

        let completion = first_ready_of(&mut channels, Some(Duration::from_secs(2)))
            .unwrap()
            .completion()
            .unwrap();
        assert_eq!(completion.source.id, 1);
        assert_eq!(completion.outcome, Ok("b"));
        assert!(channels[1].is_consumed());
        assert!(!channels[0].is_consumed());

        // the consumed channel is no longer watched
        let outcome = first_ready_of(&mut channels, Some(Duration::from_millis(20))).unwrap();
        assert!(outcome.is_timed_out());
    }

    #[test]
    fn test_first_ready_of_empty_and_spent() {
        let mut none: Vec<ResultChannel<i32>> = Vec::new();
        assert!(matches!(first_ready_of(&mut none, None), Err(Error::NoTasks)));

        let (tx, chan) = ResultChannel::<i32>::new(Source::new(0, None));
        tx.send(Completion {
            source: Source::new(0, None),
            outcome: Ok(1),
            elapsed: Duration::ZERO,
        })
        .unwrap();
        let mut channels = vec![chan];
        assert!(first_ready_of(&mut channels, None).is_ok());
        assert!(matches!(
            first_ready_of(&mut channels, None),
            Err(Error::NoPendingChannels)
        ));
    }
}
