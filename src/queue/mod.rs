//! Cache Event Queues
//!
//! Ordered, fault-tolerant delivery of cache mutation events to a single listener, usually
//! a lateral or remote peer cache. Producers never wait on the listener: events are queued
//! and delivered by a background thread, with failed deliveries retried in place.
//!
//! # Overview
//!
//! - **Facade**: [`CacheEventQueue`] offers `enqueue_put`, `enqueue_remove`,
//!   `enqueue_remove_all`, and `enqueue_dispose`, plus working state and statistics
//! - **SINGLE backend**: one lazily started worker thread per queue, strict FIFO delivery,
//!   exits after an idle timeout
//! - **POOLED backend**: events run on a named [`ThreadPool`](crate::pool::ThreadPool)
//!   shared with other queues; no ordering guarantee
//! - **Retry**: recoverable listener errors are retried up to `max_failure` times with a
//!   pause between attempts; exhausting the budget poisons the whole queue
//!
//! # Architecture
//!
//! ```text
//!  cache mutation
//!       │ enqueue_*()            (never blocks; dropped once not working)
//!       ▼
//! ┌──────────────────────────┐
//! │     CacheEventQueue      │  working: AtomicBool (sticky false)
//! └────────────┬─────────────┘
//!              │ put(event)
//!      ┌───────┴────────┐
//!      ▼                ▼
//! ┌──────────┐   ┌──────────────┐
//! │  SINGLE  │   │    POOLED    │
//! │ FIFO +   │   │ named shared │
//! │ 1 worker │   │ thread pool  │
//! └────┬─────┘   └──────┬───────┘
//!      │ deliver()      │ deliver()   retry with interruptible sleep
//!      ▼                ▼
//! ┌──────────────────────────┐
//! │      CacheListener       │
//! └──────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use cache_event_queue::config::EventQueueSettings;
//! use cache_event_queue::pool::ThreadPoolManager;
//! use cache_event_queue::queue::{
//!     CacheElement, CacheEventQueueFactory, CacheListener, ListenerBinding, ListenerError,
//! };
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl CacheListener<String, String> for Printer {
//!     fn handle_put(&self, element: &CacheElement<String, String>) -> Result<(), ListenerError> {
//!         println!("put {} = {}", element.key(), element.value());
//!         Ok(())
//!     }
//!     fn handle_remove(&self, cache_name: &str, key: &String) -> Result<(), ListenerError> {
//!         println!("remove {}:{}", cache_name, key);
//!         Ok(())
//!     }
//!     fn handle_remove_all(&self, _cache_name: &str) -> Result<(), ListenerError> {
//!         Ok(())
//!     }
//!     fn handle_dispose(&self, _cache_name: &str) -> Result<(), ListenerError> {
//!         Ok(())
//!     }
//! }
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let binding: ListenerBinding<String, String> = ListenerBinding::new(Arc::new(Printer), 1, "users");
//! let queue = CacheEventQueueFactory::create(
//!     binding,
//!     &EventQueueSettings::single(),
//!     ThreadPoolManager::global(),
//! )?;
//!
//! queue.enqueue_put(CacheElement::new("users", "alice".into(), "admin".into()));
//! queue.enqueue_remove("bob".into());
//! assert!(queue.is_working());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod delivery;
pub mod error;
pub mod event;
pub mod factory;
pub mod listener;
pub mod no_wait;
pub mod pooled;
pub mod single;
pub mod traits;
pub mod types;

pub use api::*;

#[cfg(test)]
mod tests;
