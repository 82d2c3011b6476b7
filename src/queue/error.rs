//! Queue Error Types

use crate::core::retry::Recoverable;

/// Errors raised while building, feeding, or tearing down an event queue
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("An event queue requires a listener")]
    ListenerRequired,

    #[error("A pooled event queue requires a thread pool name")]
    PoolNameRequired,

    #[error("Thread pool '{name}' is shut down")]
    PoolShutdown { name: String },

    #[error("Thread pool '{pool}' rejected work (capacity: {capacity})")]
    Rejected { pool: String, capacity: usize },

    #[error("Could not start worker thread: {message}")]
    ThreadSpawn { message: String },

    #[error("Synchronisation failure: {message}")]
    Synchronisation { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors a listener may report back to the queue
///
/// `Io` and `Transient` are recoverable: the queue retries the event. `Fatal` drops the
/// single event without retrying and without poisoning the queue.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transient failure: {message}")]
    Transient { message: String },

    #[error("Fatal failure: {message}")]
    Fatal { message: String },
}

impl ListenerError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }
}

impl Recoverable for ListenerError {
    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal { .. })
    }
}
