use crate::error::TaskFailure;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the fault boundary does after recovering a panic.
///
/// There is no abort variant: a panicking task must never take the
/// dispatching process down with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicStrategy {
    /// Recover silently; the failure is only visible as a `TaskFailure`.
    Isolate,
    /// Recover and emit a `warn` event.
    #[default]
    LogAndContinue,
}

#[derive(Debug)]
pub struct PanicHandler {
    strategy: PanicStrategy,
    panic_count: AtomicUsize,
}

impl PanicHandler {
    pub fn new(strategy: PanicStrategy) -> Self {
        Self {
            strategy,
            panic_count: AtomicUsize::new(0),
        }
    }

    /// Runs `f`, converting an unwinding panic into `TaskFailure::Panicked`.
    pub fn execute<F, R>(&self, f: F) -> Result<R, TaskFailure>
    where
        F: FnOnce() -> R,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => Ok(result),
            Err(payload) => {
                self.panic_count.fetch_add(1, Ordering::Relaxed);

                let message = panic_message(payload.as_ref());

                match self.strategy {
                    PanicStrategy::Isolate => {}
                    PanicStrategy::LogAndContinue => {
                        let thread = std::thread::current();
                        tracing::warn!(
                            thread = thread.name().unwrap_or("unnamed"),
                            %message,
                            "task panicked; recovered"
                        );
                    }
                }

                Err(TaskFailure::Panicked { message })
            }
        }
    }

    pub fn panic_count(&self) -> usize {
        self.panic_count.load(Ordering::Relaxed)
    }

    pub fn reset_count(&self) {
        self.panic_count.store(0, Ordering::Relaxed);
    }

    pub fn strategy(&self) -> PanicStrategy {
        self.strategy
    }
}

impl Default for PanicHandler {
    fn default() -> Self {
        Self::new(PanicStrategy::default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Runs `f` on the current thread behind an isolating fault boundary.
///
/// ```
/// let result = fanrace::recover(|| {
///     let divisor = 0;
///     if divisor == 0 {
///         panic!("division by zero");
///     }
///     10 / divisor
/// });
/// assert_eq!(result.unwrap_err().message(), "division by zero");
/// ```
pub fn recover<F, R>(f: F) -> Result<R, TaskFailure>
where
    F: FnOnce() -> R,
{
    PanicHandler::new(PanicStrategy::Isolate).execute(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_handler_isolate() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let result: Result<(), _> = handler.execute(|| {
            panic!("test panic");
        });

        assert_eq!(
            result.unwrap_err(),
            TaskFailure::Panicked {
                message: "test panic".to_string()
            }
        );
        assert_eq!(handler.panic_count(), 1);
    }

    #[test]
    fn test_panic_handler_success() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let result = handler.execute(|| 42);

        assert_eq!(result.unwrap(), 42);
        assert_eq!(handler.panic_count(), 0);
    }

    #[test]
    fn test_formatted_and_opaque_payloads() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let code = 7;
        let err = handler
            .execute(|| -> () { panic!("exit code {}", code) })
            .unwrap_err();
        assert_eq!(err.message(), "exit code 7");

        let err = handler
            .execute(|| -> () { std::panic::panic_any(17u32) })
            .unwrap_err();
        assert_eq!(err.message(), "unknown panic payload");
    }

    #[test]
    fn test_panic_counter() {
        let handler = PanicHandler::new(PanicStrategy::LogAndContinue);

        for _ in 0..5 {
            let _ = handler.execute(|| {
                panic!("test");
            });
        }

        assert_eq!(handler.panic_count(), 5);

        handler.reset_count();
        assert_eq!(handler.panic_count(), 0);
    }

    #[test]
    fn test_recover_helper() {
        assert_eq!(recover(|| 10 / 2).unwrap(), 5);
        assert!(recover(|| -> i32 { panic!("division by zero") })
            .unwrap_err()
            .is_panic());
    }
}
