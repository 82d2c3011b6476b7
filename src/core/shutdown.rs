//! Cooperative interruption for worker threads
//!
//! Queue workers block in two places: waiting for the next event and sleeping
//! between delivery retries. An [`Interrupt`] lets another thread cut either
//! wait short. Interruption is cooperative: a listener call that is already
//! running is never aborted, the worker only notices the interrupt the next
//! time it waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Returned by [`Interrupt::sleep`] when the sleep was cut short
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interrupted while waiting")]
pub struct Interrupted;

/// One-shot interruption signal shared between a worker and its owner
#[derive(Debug, Default)]
pub struct Interrupt {
    triggered: AtomicBool,
    lock: Mutex<()>,
    wakeup: Condvar,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the interrupt and wake every sleeper
    pub fn trigger(&self) {
        // Release pairs with the Acquire in is_triggered()
        self.triggered.store(true, Ordering::Release);

        // Notify under the lock so a sleeper between its flag check and its wait cannot miss it
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.wakeup.notify_all();
    }

    /// Check if the interrupt has been triggered
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless the interrupt fires first
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        if self.is_triggered() {
            return Err(Interrupted);
        }
        if duration.is_zero() {
            return Ok(());
        }

        let deadline = Instant::now() + duration;
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.is_triggered() {
                return Err(Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            let (next, _) = self
                .wakeup
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            guard = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sleep_completes_without_trigger() {
        let interrupt = Interrupt::new();
        let start = Instant::now();

        assert_eq!(interrupt.sleep(Duration::from_millis(20)), Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(!interrupt.is_triggered());
    }

    #[test]
    fn test_zero_sleep_returns_immediately() {
        let interrupt = Interrupt::new();
        assert_eq!(interrupt.sleep(Duration::ZERO), Ok(()));
    }

    #[test]
    fn test_sleep_after_trigger_fails_fast() {
        let interrupt = Interrupt::new();
        interrupt.trigger();

        assert_eq!(interrupt.sleep(Duration::from_secs(30)), Err(Interrupted));
        assert_eq!(interrupt.sleep(Duration::ZERO), Err(Interrupted));
    }

    #[test]
    fn test_trigger_wakes_sleeping_thread() {
        let interrupt = Arc::new(Interrupt::new());
        let sleeper = Arc::clone(&interrupt);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let result = sleeper.sleep(Duration::from_secs(30));
            (result, start.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        interrupt.trigger();

        let (result, elapsed) = handle.join().unwrap();
        assert_eq!(result, Err(Interrupted));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        interrupt.trigger();
        assert!(interrupt.is_triggered());
    }
}
