//! Pooled backend: events run on a shared, named thread pool
//!
//! Throughput over ordering: several pool workers may deliver events of the same queue at
//! once, so listeners attached to a pooled queue must tolerate out-of-order events.

use crate::core::retry::RetryPolicy;
use crate::core::shutdown::Interrupt;
use crate::pool::ThreadPool;
use crate::queue::delivery::deliver;
use crate::queue::error::QueueResult;
use crate::queue::event::CacheEvent;
use crate::queue::listener::{CacheKey, CacheValue, ListenerBinding};
use crate::queue::traits::CacheEventQueue;
use crate::queue::types::QueueType;
use crate::stats::Stats;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// State shared with the tasks submitted to the pool
struct Shared<K, V> {
    binding: ListenerBinding<K, V>,
    policy: RetryPolicy,
    working: AtomicBool,
}

impl<K: CacheKey, V: CacheValue> Shared<K, V> {
    fn run(&self, event: CacheEvent<K, V>, interrupt: &Interrupt) {
        if !self.working.load(Ordering::Acquire) {
            log::debug!("Skipping {} for {}: queue is not working", event, self.binding);
            return;
        }

        if deliver(&event, &self.binding, &self.policy, interrupt).is_poisoned()
            && self.working.swap(false, Ordering::AcqRel)
        {
            log::warn!("Pooled event queue poisoned: {}", self.binding);
        }
    }
}

/// Event queue backed by a shared [`ThreadPool`]
///
/// Poisoning stops this queue only; the pool keeps serving other queues. An explicit
/// [`destroy`](CacheEventQueue::destroy) shuts the pool down immediately.
pub struct PooledEventQueue<K, V> {
    shared: Arc<Shared<K, V>>,
    pool: Arc<ThreadPool>,
    destroyed: AtomicBool,
}

impl<K: CacheKey, V: CacheValue> PooledEventQueue<K, V> {
    pub fn new(binding: ListenerBinding<K, V>, policy: RetryPolicy, pool: Arc<ThreadPool>) -> Self {
        log::debug!(
            "Creating POOLED event queue for {} on pool '{}' (max failures {}, retry delay {:?})",
            binding,
            pool.name(),
            policy.max_failures,
            policy.retry_delay
        );
        Self {
            shared: Arc::new(Shared {
                binding,
                policy,
                working: AtomicBool::new(true),
            }),
            pool,
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }
}

impl<K: CacheKey, V: CacheValue> CacheEventQueue<K, V> for PooledEventQueue<K, V> {
    fn queue_type(&self) -> QueueType {
        QueueType::Pooled
    }

    fn binding(&self) -> &ListenerBinding<K, V> {
        &self.shared.binding
    }

    fn put(&self, event: CacheEvent<K, V>) -> QueueResult<()> {
        let shared = Arc::clone(&self.shared);
        self.pool
            .execute(Box::new(move |interrupt: &Interrupt| shared.run(event, interrupt)))
    }

    fn is_working(&self) -> bool {
        self.shared.working.load(Ordering::Acquire)
    }

    fn is_alive(&self) -> bool {
        self.is_working() && !self.pool.is_shutdown()
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shared.working.store(false, Ordering::Release);
        let discarded = self.pool.shutdown_now();
        log::info!(
            "Cache event queue destroyed: {} (pool '{}', {} pending tasks discarded)",
            self.shared.binding,
            self.pool.name(),
            discarded
        );
    }

    fn size(&self) -> usize {
        self.pool.pending()
    }

    fn backend_statistics(&self) -> Option<Stats> {
        let mut stats = Stats::new("Pool")
            .with("Pool Name", self.pool.name())
            .with("Pool Size", self.pool.pool_size());
        if let Some(capacity) = self.pool.capacity() {
            stats.push("Queue Capacity", capacity);
            stats.push(
                "Remaining Capacity",
                self.pool.remaining_capacity().unwrap_or(0),
            );
        }
        Some(stats)
    }
}

impl<K: CacheKey, V: CacheValue> std::fmt::Debug for PooledEventQueue<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledEventQueue")
            .field("binding", &self.shared.binding)
            .field("pool", &self.pool.name())
            .field("working", &self.is_working())
            .finish()
    }
}
