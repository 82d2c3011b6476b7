//! The event queue facade shared by every backend

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::event::CacheEvent;
use crate::queue::listener::{CacheElement, CacheKey, CacheValue, ListenerBinding};
use crate::queue::types::QueueType;
use crate::stats::Stats;

/// Ordered, fault-tolerant delivery of cache events to one listener
///
/// The `enqueue_*` operations never block on the listener and never report delivery
/// failures to the caller: a listener that keeps failing poisons the queue, which is
/// visible only through [`is_working`](Self::is_working). Once a queue has stopped working,
/// further events are dropped with a warning.
///
/// Backends implement the required methods; the enqueue operations and statistics are
/// provided.
pub trait CacheEventQueue<K: CacheKey, V: CacheValue>: Send + Sync {
    fn queue_type(&self) -> QueueType;

    fn binding(&self) -> &ListenerBinding<K, V>;

    /// Hand an event to the backend
    ///
    /// Backends accept the event whatever the working state; the facade operations decide
    /// whether to call this.
    fn put(&self, event: CacheEvent<K, V>) -> QueueResult<()>;

    /// True until the queue is poisoned or destroyed
    fn is_working(&self) -> bool;

    /// True while the backend can make progress on events
    fn is_alive(&self) -> bool;

    /// Stop the queue; safe to call repeatedly and from the queue's own worker
    fn destroy(&self);

    /// Events waiting for delivery (best effort for pooled queues)
    fn size(&self) -> usize;

    /// Backend-specific statistics appended after the common elements
    fn backend_statistics(&self) -> Option<Stats> {
        None
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn listener_id(&self) -> u64 {
        self.binding().listener_id()
    }

    fn cache_name(&self) -> &str {
        self.binding().cache_name()
    }

    fn enqueue_put(&self, element: CacheElement<K, V>) {
        self.submit(CacheEvent::Put(element));
    }

    fn enqueue_remove(&self, key: K) {
        self.submit(CacheEvent::Remove(key));
    }

    fn enqueue_remove_all(&self) {
        self.submit(CacheEvent::RemoveAll);
    }

    fn enqueue_dispose(&self) {
        self.submit(CacheEvent::Dispose);
    }

    /// Pass an event to the backend unless the queue has stopped working
    fn submit(&self, event: CacheEvent<K, V>) {
        if !self.is_working() {
            log::warn!("Not enqueuing {}: {} is not working", event, self.binding());
            return;
        }

        let kind = event.kind();
        match self.put(event) {
            Ok(()) => {}
            Err(e @ QueueError::Rejected { .. }) => {
                log::warn!("{} event dropped for {}: {}", kind, self.binding(), e);
            }
            Err(e) => {
                log::error!(
                    "{} event dropped for {}: {}. Marking event queue as non-functional.",
                    kind,
                    self.binding(),
                    e
                );
                self.destroy();
            }
        }
    }

    /// Snapshot for administrative display
    fn statistics(&self) -> Stats {
        let mut stats = Stats::new("Cache Event Queue")
            .with("Listener Id", self.listener_id())
            .with("Cache Name", self.cache_name())
            .with("Queue Type", self.queue_type().to_string())
            .with("Working", self.is_working())
            .with("Alive", self.is_alive())
            .with("Empty", self.is_empty())
            .with("Size", self.size());
        if let Some(extra) = self.backend_statistics() {
            stats.extend(extra);
        }
        stats
    }
}
