//! Named, shared thread pools
//!
//! POOLED event queues do not own threads. They submit retry-wrapped events to a
//! [`ThreadPool`] looked up by name through a [`ThreadPoolManager`], so many cache regions
//! can share a bounded number of worker threads.

pub mod manager;
pub mod thread_pool;

pub use manager::ThreadPoolManager;
pub use thread_pool::{Task, ThreadPool};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What a bounded pool does when its pending queue is full
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WhenBlockedPolicy {
    /// Reject the new task
    #[default]
    Abort,
    /// Drop the oldest pending task to make room
    DiscardOldest,
    /// Run the task on the submitting thread
    ///
    /// The producer then waits for the whole delivery, retry pauses included, so enqueue is
    /// no longer non-blocking while the pool is full.
    Run,
}
