//! Lock helpers for the queue and pool internals
//!
//! A lock is only poisoned when a thread panicked while holding it. Paths that can report
//! an error turn that into [`QueueError::Synchronisation`]; paths that cannot (drop,
//! destroy, statistics, condvar waits) take the guard back and log a warning.

use crate::queue::QueueError;
use std::sync::LockResult;

/// Convert a poisoned lock result into an application error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use cache_event_queue::core::sync::handle_mutex_poison;
/// use cache_event_queue::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Synchronisation { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "lock poisoned by a panic on another thread ({})",
            poison_err
        ))
    })
}

/// Lock `what`, reporting poisoning as [`QueueError::Synchronisation`]
pub fn lock_or_queue_error<T>(result: LockResult<T>, what: &str) -> Result<T, QueueError> {
    handle_mutex_poison(result, |message| QueueError::Synchronisation {
        message: format!("{}: {}", what, message),
    })
}

/// Take the guard from a possibly poisoned lock on `what`
pub fn recover_poison<T>(result: LockResult<T>, what: &str) -> T {
    result.unwrap_or_else(|poisoned| {
        log::warn!("Recovered poisoned lock on {}", what);
        poisoned.into_inner()
    })
}
