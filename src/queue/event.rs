//! Cache events carried by a queue

use crate::queue::error::ListenerError;
use crate::queue::listener::{CacheElement, ListenerBinding};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// One unit of work for a listener
///
/// Created when the cache mutates and consumed exactly once by the queue that received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent<K, V> {
    Put(CacheElement<K, V>),
    Remove(K),
    RemoveAll,
    Dispose,
}

/// The listener method an event maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum EventKind {
    Put,
    Remove,
    RemoveAll,
    Dispose,
}

impl<K, V> CacheEvent<K, V> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Put(_) => EventKind::Put,
            Self::Remove(_) => EventKind::Remove,
            Self::RemoveAll => EventKind::RemoveAll,
            Self::Dispose => EventKind::Dispose,
        }
    }

    /// Invoke the matching listener method once
    pub fn dispatch(&self, binding: &ListenerBinding<K, V>) -> Result<(), ListenerError> {
        let listener = binding.listener();
        match self {
            Self::Put(element) => listener.handle_put(element),
            Self::Remove(key) => listener.handle_remove(binding.cache_name(), key),
            Self::RemoveAll => listener.handle_remove_all(binding.cache_name()),
            Self::Dispose => listener.handle_dispose(binding.cache_name()),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for CacheEvent<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put(element) => write!(
                f,
                "PutEvent for key: {:?} value: {:?}",
                element.key(),
                element.value()
            ),
            Self::Remove(key) => write!(f, "RemoveEvent for {:?}", key),
            Self::RemoveAll => write!(f, "RemoveAllEvent"),
            Self::Dispose => write!(f, "DisposeEvent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::listener::CacheListener;
    use std::sync::{Arc, Mutex};
    use strum::IntoEnumIterator;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl CacheListener<&'static str, u32> for Recorder {
        fn handle_put(&self, element: &CacheElement<&'static str, u32>) -> Result<(), ListenerError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("put:{}={}", element.key(), element.value()));
            Ok(())
        }

        fn handle_remove(&self, cache_name: &str, key: &&'static str) -> Result<(), ListenerError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("remove:{}:{}", cache_name, key));
            Ok(())
        }

        fn handle_remove_all(&self, cache_name: &str) -> Result<(), ListenerError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("remove_all:{}", cache_name));
            Ok(())
        }

        fn handle_dispose(&self, cache_name: &str) -> Result<(), ListenerError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("dispose:{}", cache_name));
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_calls_matching_listener_method() {
        let recorder = Arc::new(Recorder::default());
        let binding: ListenerBinding<&str, u32> = ListenerBinding::new(recorder.clone(), 1, "users");

        let events = vec![
            CacheEvent::Put(CacheElement::new("users", "k1", 1)),
            CacheEvent::Remove("k1"),
            CacheEvent::RemoveAll,
            CacheEvent::Dispose,
        ];
        for event in &events {
            event.dispatch(&binding).unwrap();
        }

        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec![
                "put:k1=1".to_string(),
                "remove:users:k1".to_string(),
                "remove_all:users".to_string(),
                "dispose:users".to_string(),
            ]
        );
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(CacheEvent::<u8, u8>::RemoveAll.kind(), EventKind::RemoveAll);
        assert_eq!(CacheEvent::<u8, u8>::Remove(3).kind(), EventKind::Remove);
        assert_eq!(EventKind::iter().count(), 4);
        assert_eq!(EventKind::RemoveAll.to_string(), "RemoveAll");
    }

    #[test]
    fn test_event_display() {
        let put = CacheEvent::Put(CacheElement::new("users", "k1", 5));
        assert_eq!(put.to_string(), "PutEvent for key: \"k1\" value: 5");
        assert_eq!(
            CacheEvent::<&str, u8>::Remove("k1").to_string(),
            "RemoveEvent for \"k1\""
        );
        assert_eq!(CacheEvent::<u8, u8>::Dispose.to_string(), "DisposeEvent");
    }
}
