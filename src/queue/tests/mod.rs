//! Test modules for the event queue system
//!
//! Tests are organized by functional area. Shared fixtures live here: a listener that
//! records every call and can be scripted to fail, plus a polling helper for waiting on
//! background delivery.


use crate::queue::error::ListenerError;
use crate::queue::listener::{CacheElement, CacheListener, ListenerBinding};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A listener call as observed by [`RecordingListener`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    Put(String, u32),
    Remove(String, String),
    RemoveAll(String),
    Dispose(String),
}

/// How the listener responds to each call
#[derive(Debug, Clone, Copy)]
pub(super) enum Script {
    Succeed,
    /// Transient failure for the first `n` calls, then success
    FailFirst(u32),
    /// Fatal failure for the first `n` calls, then success
    FatalFirst(u32),
    AlwaysFail,
}

pub(super) struct RecordingListener {
    script: Script,
    /// Put values that sleep this long before completing
    slow_values: Vec<(u32, Duration)>,
    attempts: AtomicU32,
    calls: Mutex<Vec<Call>>,
}

impl RecordingListener {
    pub(super) fn new(script: Script) -> Arc<Self> {
        Self::with_slow_values(script, Vec::new())
    }

    pub(super) fn with_slow_values(script: Script, slow_values: Vec<(u32, Duration)>) -> Arc<Self> {
        Arc::new(Self {
            script,
            slow_values,
            attempts: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every invocation, including failed ones
    pub(super) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successful calls in completion order
    pub(super) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(super) fn put_values(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Put(_, value) => Some(value),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<(), ListenerError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::FailFirst(n) if attempt < n => {
                return Err(ListenerError::transient("peer unreachable"))
            }
            Script::FatalFirst(n) if attempt < n => {
                return Err(ListenerError::fatal("peer rejected payload"))
            }
            Script::AlwaysFail => {
                return Err(ListenerError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )))
            }
            _ => {}
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl CacheListener<String, u32> for RecordingListener {
    fn handle_put(&self, element: &CacheElement<String, u32>) -> Result<(), ListenerError> {
        if let Some((_, delay)) = self
            .slow_values
            .iter()
            .find(|(value, _)| value == element.value())
        {
            thread::sleep(*delay);
        }
        self.record(Call::Put(element.key().clone(), *element.value()))
    }

    fn handle_remove(&self, cache_name: &str, key: &String) -> Result<(), ListenerError> {
        self.record(Call::Remove(cache_name.to_string(), key.clone()))
    }

    fn handle_remove_all(&self, cache_name: &str) -> Result<(), ListenerError> {
        self.record(Call::RemoveAll(cache_name.to_string()))
    }

    fn handle_dispose(&self, cache_name: &str) -> Result<(), ListenerError> {
        self.record(Call::Dispose(cache_name.to_string()))
    }
}

pub(super) fn binding(listener: &Arc<RecordingListener>) -> ListenerBinding<String, u32> {
    ListenerBinding::new(listener.clone(), 42, "region")
}

pub(super) fn element(key: &str, value: u32) -> CacheElement<String, u32> {
    CacheElement::new("region", key.to_string(), value)
}

/// Poll `condition` until it holds or `timeout` passes
pub(super) fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

pub(super) const WAIT: Duration = Duration::from_secs(5);
