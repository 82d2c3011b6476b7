//! Fire-and-forget front end for an auxiliary cache
//!
//! A [`NoWaitDispatcher`] owns an event queue for one listener and turns cache updates into
//! queued events, so the cache never waits on the remote or lateral peer. It can swap its
//! queue for a fresh one after the old one has been poisoned.

use crate::config::EventQueueSettings;
use crate::core::sync::lock_or_queue_error;
use crate::pool::ThreadPoolManager;
use crate::queue::error::QueueResult;
use crate::queue::factory::CacheEventQueueFactory;
use crate::queue::listener::{CacheElement, CacheKey, CacheValue, ListenerBinding};
use crate::queue::traits::CacheEventQueue;
use crate::stats::Stats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard};
use strum_macros::Display;

/// Health of an auxiliary cache as seen through its event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CacheStatus {
    Alive,
    Error,
}

type BoxedQueue<K, V> = Box<dyn CacheEventQueue<K, V>>;

pub struct NoWaitDispatcher<'p, K: CacheKey, V: CacheValue> {
    binding: ListenerBinding<K, V>,
    settings: EventQueueSettings,
    pools: &'p ThreadPoolManager,
    queue: RwLock<BoxedQueue<K, V>>,
    put_count: AtomicU64,
    remove_count: AtomicU64,
}

impl<'p, K: CacheKey, V: CacheValue> NoWaitDispatcher<'p, K, V> {
    pub fn new(
        binding: ListenerBinding<K, V>,
        settings: EventQueueSettings,
        pools: &'p ThreadPoolManager,
    ) -> QueueResult<Self> {
        let queue = CacheEventQueueFactory::create(binding.clone(), &settings, pools)?;
        Ok(Self {
            binding,
            settings,
            pools,
            queue: RwLock::new(queue),
            put_count: AtomicU64::new(0),
            remove_count: AtomicU64::new(0),
        })
    }

    fn queue(&self) -> QueueResult<RwLockReadGuard<'_, BoxedQueue<K, V>>> {
        lock_or_queue_error(self.queue.read(), "event queue")
    }

    /// Queue a put for the listener
    pub fn update(&self, element: CacheElement<K, V>) -> QueueResult<()> {
        self.put_count.fetch_add(1, Ordering::Relaxed);
        self.queue()?.enqueue_put(element);
        Ok(())
    }

    /// Queue a remove for the listener; always reports that nothing was removed locally
    pub fn remove(&self, key: K) -> QueueResult<bool> {
        self.remove_count.fetch_add(1, Ordering::Relaxed);
        self.queue()?.enqueue_remove(key);
        Ok(false)
    }

    pub fn remove_all(&self) -> QueueResult<()> {
        self.queue()?.enqueue_remove_all();
        Ok(())
    }

    pub fn dispose(&self) -> QueueResult<()> {
        self.queue()?.enqueue_dispose();
        Ok(())
    }

    pub fn status(&self) -> CacheStatus {
        match self.queue() {
            Ok(queue) if queue.is_working() => CacheStatus::Alive,
            _ => CacheStatus::Error,
        }
    }

    pub fn is_working(&self) -> bool {
        self.status() == CacheStatus::Alive
    }

    pub fn cache_name(&self) -> &str {
        self.binding.cache_name()
    }

    pub fn put_count(&self) -> u64 {
        self.put_count.load(Ordering::Relaxed)
    }

    pub fn remove_count(&self) -> u64 {
        self.remove_count.load(Ordering::Relaxed)
    }

    /// Replace the event queue with a fresh one for the same listener
    ///
    /// A previous queue that is still working is destroyed first; its pending events are
    /// lost.
    pub fn reset_event_queue(&self) -> QueueResult<()> {
        let mut queue = lock_or_queue_error(self.queue.write(), "event queue")?;

        if queue.is_working() {
            log::info!(
                "Resetting working event queue for {}; {} pending events discarded",
                self.binding,
                queue.size()
            );
            queue.destroy();
        } else {
            log::info!("Replacing poisoned event queue for {}", self.binding);
        }

        *queue = CacheEventQueueFactory::create(self.binding.clone(), &self.settings, self.pools)?;
        Ok(())
    }

    pub fn statistics(&self) -> Stats {
        let mut stats = Stats::new("No Wait").with("Status", self.status().to_string());
        if let Ok(queue) = self.queue() {
            stats.extend(queue.statistics());
        }
        stats.push("Put Count", self.put_count());
        stats.push("Remove Count", self.remove_count());
        stats
    }
}

impl<K: CacheKey, V: CacheValue> std::fmt::Display for NoWaitDispatcher<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NoWait [cacheName={}, status={}]", self.cache_name(), self.status())
    }
}
