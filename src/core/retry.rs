//! Retry utility for delivering work that can fail transiently
//!
//! Provides a bounded retry policy and a blocking retry loop. The loop runs on the
//! calling thread and sleeps between attempts, so a slow or failing operation
//! stalls only the thread that owns it.

use crate::core::shutdown::Interrupt;
use std::fmt::Display;
use std::time::Duration;

/// Configurable retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of recoverable failures tolerated before giving up (always at least 1)
    pub max_failures: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_failures: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_failures: u32, retry_delay: Duration) -> Self {
        Self {
            max_failures: max_failures.max(1),
            retry_delay,
        }
    }
}

/// Errors that know whether another attempt could succeed
pub trait Recoverable {
    fn is_recoverable(&self) -> bool;
}

/// How a retried operation ended
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// The operation succeeded after `attempts` tries
    Succeeded { value: T, attempts: u32 },
    /// A non-recoverable error ended the loop without further attempts
    Fatal { error: E, attempts: u32 },
    /// Every allowed attempt failed with a recoverable error
    Exhausted { last_error: E, attempts: u32 },
    /// The pause before the next attempt was interrupted
    Interrupted { last_error: E, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. }
            | Self::Fatal { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::Interrupted { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Execute an operation, retrying recoverable failures on the current thread
///
/// The failure counter is local to this call: it starts at zero and the loop stops
/// as soon as it reaches `policy.max_failures`. Between attempts the thread sleeps
/// for `policy.retry_delay`; triggering `interrupt` ends the sleep and the loop.
///
/// # Examples
/// ```rust
/// use cache_event_queue::core::retry::{retry_blocking, Recoverable, RetryPolicy};
/// use cache_event_queue::core::shutdown::Interrupt;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Flaky;
/// impl std::fmt::Display for Flaky {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "flaky")
///     }
/// }
/// impl Recoverable for Flaky {
///     fn is_recoverable(&self) -> bool {
///         true
///     }
/// }
///
/// let policy = RetryPolicy::new(3, Duration::ZERO);
/// let mut calls = 0;
/// let outcome = retry_blocking("example", &policy, &Interrupt::new(), || {
///     calls += 1;
///     if calls < 2 { Err(Flaky) } else { Ok(calls) }
/// });
/// assert!(outcome.is_success());
/// assert_eq!(outcome.attempts(), 2);
/// ```
pub fn retry_blocking<F, T, E>(
    operation_name: &str,
    policy: &RetryPolicy,
    interrupt: &Interrupt,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Recoverable + Display,
{
    let max_failures = policy.max_failures.max(1);
    let mut failures = 0u32;

    loop {
        let error = match operation() {
            Ok(value) => {
                return RetryOutcome::Succeeded {
                    value,
                    attempts: failures + 1,
                }
            }
            Err(error) if !error.is_recoverable() => {
                return RetryOutcome::Fatal {
                    error,
                    attempts: failures + 1,
                }
            }
            Err(error) => error,
        };

        failures += 1;
        log::warn!(
            "Operation '{}' failed on attempt {}/{}: {}",
            operation_name,
            failures,
            max_failures,
            error
        );

        if failures >= max_failures {
            return RetryOutcome::Exhausted {
                last_error: error,
                attempts: failures,
            };
        }

        log::info!(
            "Retrying '{}' in {:?}",
            operation_name,
            policy.retry_delay
        );
        if interrupt.sleep(policy.retry_delay).is_err() {
            return RetryOutcome::Interrupted {
                last_error: error,
                attempts: failures,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Temporary,
        Permanent,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Recoverable for TestError {
        fn is_recoverable(&self) -> bool {
            matches!(self, TestError::Temporary)
        }
    }

    fn no_delay(max_failures: u32) -> RetryPolicy {
        RetryPolicy::new(max_failures, Duration::ZERO)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_failures, 3);
        assert_eq!(policy.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_policy_clamps_zero_failures() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_failures, 1);
    }

    #[test]
    fn test_retry_succeeds_immediately() {
        let outcome = retry_blocking("test_operation", &no_delay(3), &Interrupt::new(), || {
            Ok::<i32, TestError>(42)
        });

        match outcome {
            RetryOutcome::Succeeded { value, attempts } => {
                assert_eq!(value, 42);
                assert_eq!(attempts, 1);
            }
            other => panic!("Expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_retry_succeeds_after_failures() {
        let mut calls = 0;
        let outcome = retry_blocking("test_operation", &no_delay(3), &Interrupt::new(), || {
            calls += 1;
            if calls < 3 {
                Err(TestError::Temporary)
            } else {
                Ok(calls)
            }
        });

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_retry_exhausts_attempts() {
        let mut calls = 0;
        let outcome = retry_blocking("test_operation", &no_delay(2), &Interrupt::new(), || {
            calls += 1;
            Err::<(), _>(TestError::Temporary)
        });

        match outcome {
            RetryOutcome::Exhausted {
                last_error,
                attempts,
            } => {
                assert_eq!(last_error, TestError::Temporary);
                assert_eq!(attempts, 2);
            }
            other => panic!("Expected exhaustion, got {:?}", other),
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_fatal_error_is_not_retried() {
        let mut calls = 0;
        let outcome = retry_blocking("test_operation", &no_delay(5), &Interrupt::new(), || {
            calls += 1;
            Err::<(), _>(TestError::Permanent)
        });

        assert!(matches!(outcome, RetryOutcome::Fatal { attempts: 1, .. }));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_retry_waits_between_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let start = Instant::now();
        let outcome = retry_blocking("test_operation", &policy, &Interrupt::new(), || {
            Err::<(), _>(TestError::Temporary)
        });

        assert_eq!(outcome.attempts(), 3);
        // Two pauses between three attempts
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_interrupt_stops_retry_loop() {
        let interrupt = Arc::new(Interrupt::new());
        let trigger = Arc::clone(&interrupt);
        let policy = RetryPolicy::new(10, Duration::from_secs(30));

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            trigger.trigger();
        });

        let outcome = retry_blocking("test_operation", &policy, &interrupt, || {
            Err::<(), _>(TestError::Temporary)
        });
        handle.join().unwrap();

        assert!(matches!(
            outcome,
            RetryOutcome::Interrupted { attempts: 1, .. }
        ));
    }
}
