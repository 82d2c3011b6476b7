//! Public API for the event queue system
//!
//! External modules should import from here rather than directly from the backend modules.
//! See the module documentation for usage examples and architecture details.

// Facade and backends
pub use crate::queue::factory::CacheEventQueueFactory;
pub use crate::queue::pooled::PooledEventQueue;
pub use crate::queue::single::SingleEventQueue;
pub use crate::queue::traits::CacheEventQueue;
pub use crate::queue::types::QueueType;

// Events and listeners
pub use crate::queue::delivery::Delivery;
pub use crate::queue::event::{CacheEvent, EventKind};
pub use crate::queue::listener::{CacheElement, CacheKey, CacheListener, CacheValue, ListenerBinding};

// Auxiliary cache front end
pub use crate::queue::no_wait::{CacheStatus, NoWaitDispatcher};

// Error handling
pub use crate::queue::error::{ListenerError, QueueError, QueueResult};
