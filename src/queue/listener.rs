//! Listener contract and the binding that ties a listener to one queue

use crate::queue::error::{ListenerError, QueueError, QueueResult};
use std::fmt;
use std::sync::Arc;

/// Bounds every cache key must satisfy to travel through a queue
pub trait CacheKey: fmt::Debug + Send + Sync + 'static {}
impl<T: fmt::Debug + Send + Sync + 'static> CacheKey for T {}

/// Bounds every cache value must satisfy to travel through a queue
pub trait CacheValue: fmt::Debug + Send + Sync + 'static {}
impl<T: fmt::Debug + Send + Sync + 'static> CacheValue for T {}

/// A cached key/value pair together with the region it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheElement<K, V> {
    cache_name: String,
    key: K,
    value: V,
}

impl<K, V> CacheElement<K, V> {
    pub fn new(cache_name: impl Into<String>, key: K, value: V) -> Self {
        Self {
            cache_name: cache_name.into(),
            key,
            value,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Recipient of ordered cache mutation notifications
///
/// Implementations usually forward to a lateral or remote peer. Returning a recoverable
/// [`ListenerError`] makes the queue retry the event; see [`ListenerError`] for the kinds.
pub trait CacheListener<K, V>: Send + Sync {
    fn handle_put(&self, element: &CacheElement<K, V>) -> Result<(), ListenerError>;

    fn handle_remove(&self, cache_name: &str, key: &K) -> Result<(), ListenerError>;

    fn handle_remove_all(&self, cache_name: &str) -> Result<(), ListenerError>;

    fn handle_dispose(&self, cache_name: &str) -> Result<(), ListenerError>;
}

/// The listener, its peer id, and the region a queue delivers for
///
/// Immutable for the life of the queue that owns it.
pub struct ListenerBinding<K, V> {
    listener: Arc<dyn CacheListener<K, V>>,
    listener_id: u64,
    cache_name: String,
}

impl<K, V> ListenerBinding<K, V> {
    pub fn new(
        listener: Arc<dyn CacheListener<K, V>>,
        listener_id: u64,
        cache_name: impl Into<String>,
    ) -> Self {
        Self {
            listener,
            listener_id,
            cache_name: cache_name.into(),
        }
    }

    /// Build a binding from a listener that may not have been supplied
    pub fn try_new(
        listener: Option<Arc<dyn CacheListener<K, V>>>,
        listener_id: u64,
        cache_name: impl Into<String>,
    ) -> QueueResult<Self> {
        let listener = listener.ok_or(QueueError::ListenerRequired)?;
        Ok(Self::new(listener, listener_id, cache_name))
    }

    pub fn listener(&self) -> &dyn CacheListener<K, V> {
        self.listener.as_ref()
    }

    pub fn listener_id(&self) -> u64 {
        self.listener_id
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }
}

impl<K, V> Clone for ListenerBinding<K, V> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            listener_id: self.listener_id,
            cache_name: self.cache_name.clone(),
        }
    }
}

impl<K, V> fmt::Debug for ListenerBinding<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerBinding")
            .field("listener_id", &self.listener_id)
            .field("cache_name", &self.cache_name)
            .finish()
    }
}

impl<K, V> fmt::Display for ListenerBinding<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheEventQueue [listenerId={}, cacheName={}]",
            self.listener_id, self.cache_name
        )
    }
}
