//! Common test utilities and helpers
//!
//! A listener that collects what it is given, and a polling helper for waiting on
//! background delivery.

#![allow(dead_code)]

use cache_event_queue::queue::{CacheElement, CacheListener, ListenerBinding, ListenerError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

pub const WAIT: Duration = Duration::from_secs(5);

/// Records each delivered event as a short string
#[derive(Default)]
pub struct CollectingListener {
    fail_remaining: AtomicU32,
    seen: Mutex<Vec<String>>,
}

impl CollectingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the first `failures` calls with a transient error
    pub fn failing(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            fail_remaining: AtomicU32::new(failures),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, entry: String) -> Result<(), ListenerError> {
        let failing = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ListenerError::transient("remote unavailable"));
        }
        self.seen.lock().unwrap().push(entry);
        Ok(())
    }
}

impl CacheListener<String, u32> for CollectingListener {
    fn handle_put(&self, element: &CacheElement<String, u32>) -> Result<(), ListenerError> {
        self.record(format!("put {}={}", element.key(), element.value()))
    }

    fn handle_remove(&self, _cache_name: &str, key: &String) -> Result<(), ListenerError> {
        self.record(format!("remove {}", key))
    }

    fn handle_remove_all(&self, cache_name: &str) -> Result<(), ListenerError> {
        self.record(format!("remove_all {}", cache_name))
    }

    fn handle_dispose(&self, cache_name: &str) -> Result<(), ListenerError> {
        self.record(format!("dispose {}", cache_name))
    }
}

pub fn binding(listener: &Arc<CollectingListener>, cache_name: &str) -> ListenerBinding<String, u32> {
    ListenerBinding::new(listener.clone(), 7, cache_name)
}

pub fn element(cache_name: &str, key: &str, value: u32) -> CacheElement<String, u32> {
    CacheElement::new(cache_name, key.to_string(), value)
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
