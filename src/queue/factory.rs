//! Backend selection

use crate::config::EventQueueSettings;
use crate::pool::ThreadPoolManager;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::listener::{CacheKey, CacheValue, ListenerBinding};
use crate::queue::pooled::PooledEventQueue;
use crate::queue::single::SingleEventQueue;
use crate::queue::traits::CacheEventQueue;
use crate::queue::types::QueueType;

/// Builds the event queue backend named by the settings
pub struct CacheEventQueueFactory;

impl CacheEventQueueFactory {
    /// Create a queue for `binding`
    ///
    /// POOLED queues look their pool up in `pools`, starting it if needed.
    pub fn create<K: CacheKey, V: CacheValue>(
        binding: ListenerBinding<K, V>,
        settings: &EventQueueSettings,
        pools: &ThreadPoolManager,
    ) -> QueueResult<Box<dyn CacheEventQueue<K, V>>> {
        let policy = settings.retry_policy();
        match settings.queue_type {
            QueueType::Single => Ok(Box::new(SingleEventQueue::new(
                binding,
                policy,
                settings.wait_to_die(),
            ))),
            QueueType::Pooled => {
                let pool_name = settings
                    .pool_name
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .ok_or(QueueError::PoolNameRequired)?;
                let pool = pools.get_pool(pool_name)?;
                Ok(Box::new(PooledEventQueue::new(binding, policy, pool)))
            }
        }
    }
}
