//! Synthetic workload for `ceq`
//!
//! A logging listener that fails its first calls, a burst of put events, and a wait for the
//! queue to drain or be poisoned.

use crate::config::Config;
use crate::pool::ThreadPoolManager;
use crate::queue::{
    CacheElement, CacheEventQueueFactory, CacheListener, ListenerBinding, ListenerError,
    QueueResult,
};
use crate::stats::Stats;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Cache region used for the synthetic events
pub const DEMO_CACHE_NAME: &str = "demo";

/// Listener that logs each event and fails the first `fail_first` calls transiently
#[derive(Debug, Default)]
pub struct DemoListener {
    failures_left: AtomicU32,
    attempts: AtomicU64,
    delivered: AtomicU64,
}

impl DemoListener {
    pub fn new(fail_first: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(fail_first),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    fn handle(&self, description: String) -> Result<(), ListenerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ListenerError::transient(format!(
                "simulated peer outage during {}",
                description
            )));
        }
        log::info!("Delivered {}", description);
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl CacheListener<String, String> for DemoListener {
    fn handle_put(&self, element: &CacheElement<String, String>) -> Result<(), ListenerError> {
        self.handle(format!("put {}={}", element.key(), element.value()))
    }

    fn handle_remove(&self, cache_name: &str, key: &String) -> Result<(), ListenerError> {
        self.handle(format!("remove {}:{}", cache_name, key))
    }

    fn handle_remove_all(&self, cache_name: &str) -> Result<(), ListenerError> {
        self.handle(format!("remove all {}", cache_name))
    }

    fn handle_dispose(&self, cache_name: &str) -> Result<(), ListenerError> {
        self.handle(format!("dispose {}", cache_name))
    }
}

/// Result of one demo run
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub stats: Stats,
    pub working: bool,
    pub expected: u64,
    pub delivered: u64,
    pub attempts: u64,
}

/// Options for one demo run
#[derive(Debug, Clone, Copy)]
pub struct DemoOptions {
    pub events: u32,
    pub fail_first: u32,
    pub drain_timeout: Duration,
}

/// Enqueue `events` puts plus one remove, remove-all, and dispose, then wait for the
/// listener to see them all or for the queue to stop working
pub fn run_demo(
    config: &Config,
    options: DemoOptions,
    pools: &ThreadPoolManager,
) -> QueueResult<DemoReport> {
    let listener = Arc::new(DemoListener::new(options.fail_first));
    let binding: ListenerBinding<String, String> =
        ListenerBinding::new(listener.clone(), 1, DEMO_CACHE_NAME);
    let queue = CacheEventQueueFactory::create(binding, &config.event_queue, pools)?;
    let started = chrono::Local::now();

    log::info!(
        "Enqueuing {} events on a {} queue",
        options.events,
        queue.queue_type()
    );
    for i in 0..options.events {
        queue.enqueue_put(CacheElement::new(
            DEMO_CACHE_NAME,
            format!("key-{}", i),
            format!("value-{}", i),
        ));
    }
    queue.enqueue_remove("key-0".to_string());
    queue.enqueue_remove_all();
    queue.enqueue_dispose();

    let expected = u64::from(options.events) + 3;
    let deadline = Instant::now() + options.drain_timeout;
    while listener.delivered() < expected && queue.is_working() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }

    let working = queue.is_working();
    if !working {
        log::warn!("{} stopped working", queue.binding());
    } else if listener.delivered() < expected {
        log::warn!(
            "Timed out after {:?} with {} of {} events delivered",
            options.drain_timeout,
            listener.delivered(),
            expected
        );
    }

    let mut stats = queue.statistics();
    stats.push("Expected", expected);
    stats.push("Delivered", listener.delivered());
    stats.push("Attempts", listener.attempts());
    stats.push("Started", started.to_rfc3339());
    let elapsed = (chrono::Local::now() - started).num_milliseconds();
    stats.push("Elapsed Ms", u64::try_from(elapsed).unwrap_or(0));

    Ok(DemoReport {
        stats,
        working,
        expected,
        delivered: listener.delivered(),
        attempts: listener.attempts(),
    })
}
