//! Retry wrapper around a single event delivery
//!
//! Every backend runs events through [`deliver`] on whichever thread picked the event
//! up. Recoverable listener failures are retried in place with a pause between attempts;
//! when the budget runs out, or the pause is interrupted, the caller is told to poison
//! its queue.

use crate::core::retry::{retry_blocking, RetryOutcome, RetryPolicy};
use crate::core::shutdown::Interrupt;
use crate::queue::event::CacheEvent;
use crate::queue::listener::{CacheKey, CacheValue, ListenerBinding};

/// What happened to one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The listener accepted the event
    Delivered { attempts: u32 },
    /// The listener raised a non-recoverable error; only this event is lost
    Dropped,
    /// Retries were exhausted or interrupted; the owning queue must stop working
    Poisoned { attempts: u32 },
}

impl Delivery {
    pub fn is_poisoned(&self) -> bool {
        matches!(self, Self::Poisoned { .. })
    }
}

/// Deliver `event` to the bound listener under `policy`
pub fn deliver<K: CacheKey, V: CacheValue>(
    event: &CacheEvent<K, V>,
    binding: &ListenerBinding<K, V>,
    policy: &RetryPolicy,
    interrupt: &Interrupt,
) -> Delivery {
    let operation_name = event.to_string();
    let outcome = retry_blocking(&operation_name, policy, interrupt, || {
        event.dispatch(binding)
    });

    match outcome {
        RetryOutcome::Succeeded { attempts, .. } => {
            if attempts > 1 {
                log::debug!("{} delivered after {} attempts for {}", event, attempts, binding);
            }
            Delivery::Delivered { attempts }
        }
        RetryOutcome::Fatal { error, .. } => {
            log::error!(
                "Non-recoverable failure delivering {} for {}; event dropped: {}",
                event,
                binding,
                error
            );
            Delivery::Dropped
        }
        RetryOutcome::Exhausted {
            last_error,
            attempts,
        } => {
            log::warn!(
                "Error while running event from queue {}: {}. Dropping event and marking event queue as non-functional ({} attempts).",
                binding,
                last_error,
                attempts
            );
            Delivery::Poisoned { attempts }
        }
        RetryOutcome::Interrupted { attempts, .. } => {
            log::warn!(
                "Interrupted while sleeping for retry on event {} for {}.",
                event,
                binding
            );
            Delivery::Poisoned { attempts }
        }
    }
}
