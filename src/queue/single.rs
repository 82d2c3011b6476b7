//! Single-worker backend: strict FIFO delivery on one lazily started thread
//!
//! The worker is spawned by the first `put` after the queue has been idle, drains the
//! FIFO one event at a time, and exits after `wait_to_die` without new events. At most one
//! worker exists per queue, which is what keeps delivery in enqueue order.

use crate::core::retry::RetryPolicy;
use crate::core::shutdown::Interrupt;
use crate::core::sync::{lock_or_queue_error, recover_poison};
use crate::queue::delivery::{deliver, Delivery};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::event::CacheEvent;
use crate::queue::listener::{CacheKey, CacheValue, ListenerBinding};
use crate::queue::traits::CacheEventQueue;
use crate::queue::types::QueueType;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to the running worker
struct Worker {
    /// Distinguishes this worker from ones started later
    generation: u64,
    interrupt: Arc<Interrupt>,
}

struct WorkerState<K, V> {
    fifo: VecDeque<CacheEvent<K, V>>,
    worker: Option<Worker>,
}

struct Shared<K, V> {
    binding: ListenerBinding<K, V>,
    policy: RetryPolicy,
    wait_to_die: Duration,
    working: AtomicBool,
    state: Mutex<WorkerState<K, V>>,
    available: Condvar,
    workers_spawned: AtomicU64,
}

impl<K: CacheKey, V: CacheValue> Shared<K, V> {
    fn lock_state(&self) -> MutexGuard<'_, WorkerState<K, V>> {
        recover_poison(self.state.lock(), "worker state")
    }

    fn is_working(&self) -> bool {
        self.working.load(Ordering::Acquire)
    }

    fn run_worker(self: Arc<Self>, generation: u64, interrupt: Arc<Interrupt>) {
        log::debug!("Worker {} started for {}", generation, self.binding);

        while let Some(event) = self.next_event(generation, &interrupt) {
            let delivery = panic::catch_unwind(AssertUnwindSafe(|| {
                deliver(&event, &self.binding, &self.policy, &interrupt)
            }))
            .unwrap_or_else(|_| {
                log::error!("Listener panicked handling {} for {}", event, self.binding);
                Delivery::Dropped
            });

            if delivery.is_poisoned() {
                self.destroy();
                break;
            }
        }

        log::debug!("Worker {} stopped for {}", generation, self.binding);
    }

    /// Wait for the next event
    ///
    /// Returns `None` when the queue stops working, the worker is interrupted, or no event
    /// arrives within `wait_to_die`. An idle worker clears itself from the state under the
    /// same lock `put` takes, so an event is never left behind without a worker.
    fn next_event(&self, generation: u64, interrupt: &Interrupt) -> Option<CacheEvent<K, V>> {
        let deadline = Instant::now() + self.wait_to_die;
        let mut state = self.lock_state();
        loop {
            if interrupt.is_triggered() || !self.is_working() {
                return None;
            }
            if let Some(event) = state.fifo.pop_front() {
                return Some(event);
            }

            let now = Instant::now();
            if now >= deadline {
                if state.worker.as_ref().map(|w| w.generation) == Some(generation) {
                    state.worker = None;
                }
                log::debug!(
                    "Worker {} for {} idle for {:?}, exiting",
                    generation,
                    self.binding,
                    self.wait_to_die
                );
                return None;
            }

            let (next, _) = recover_poison(
                self.available.wait_timeout(state, deadline - now),
                "worker state",
            );
            state = next;
        }
    }

    /// Mark the queue not working and interrupt the worker without waiting for it
    fn destroy(&self) {
        let was_working = self.working.swap(false, Ordering::AcqRel);

        let mut state = self.lock_state();
        if let Some(worker) = state.worker.take() {
            worker.interrupt.trigger();
        }
        drop(state);
        self.available.notify_all();

        if was_working {
            log::info!("Cache event queue destroyed: {}", self.binding);
        }
    }
}

/// Event queue with one dedicated, lazily started worker thread
///
/// Delivery order is exactly enqueue order. The FIFO is unbounded; once the queue is
/// poisoned the facade stops adding to it.
pub struct SingleEventQueue<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K: CacheKey, V: CacheValue> SingleEventQueue<K, V> {
    pub fn new(binding: ListenerBinding<K, V>, policy: RetryPolicy, wait_to_die: Duration) -> Self {
        log::debug!(
            "Creating SINGLE event queue for {} (max failures {}, retry delay {:?}, wait to die {:?})",
            binding,
            policy.max_failures,
            policy.retry_delay,
            wait_to_die
        );
        Self {
            shared: Arc::new(Shared {
                binding,
                policy,
                wait_to_die,
                working: AtomicBool::new(true),
                state: Mutex::new(WorkerState {
                    fifo: VecDeque::new(),
                    worker: None,
                }),
                available: Condvar::new(),
                workers_spawned: AtomicU64::new(0),
            }),
        }
    }

    /// Number of worker threads started over the queue's life
    pub fn workers_spawned(&self) -> u64 {
        self.shared.workers_spawned.load(Ordering::Acquire)
    }

    fn spawn_worker(&self, state: &mut WorkerState<K, V>) -> QueueResult<()> {
        let generation = self.shared.workers_spawned.fetch_add(1, Ordering::AcqRel) + 1;
        let interrupt = Arc::new(Interrupt::new());

        let shared = Arc::clone(&self.shared);
        let worker_interrupt = Arc::clone(&interrupt);
        thread::Builder::new()
            .name(format!("cache-event-queue-{}", self.shared.binding.cache_name()))
            .spawn(move || shared.run_worker(generation, worker_interrupt))
            .map_err(|e| QueueError::ThreadSpawn {
                message: e.to_string(),
            })?;

        state.worker = Some(Worker {
            generation,
            interrupt,
        });
        Ok(())
    }
}

impl<K: CacheKey, V: CacheValue> CacheEventQueue<K, V> for SingleEventQueue<K, V> {
    fn queue_type(&self) -> QueueType {
        QueueType::Single
    }

    fn binding(&self) -> &ListenerBinding<K, V> {
        &self.shared.binding
    }

    fn put(&self, event: CacheEvent<K, V>) -> QueueResult<()> {
        let mut state = lock_or_queue_error(self.shared.state.lock(), "worker state")?;

        state.fifo.push_back(event);
        if state.worker.is_none() && self.shared.is_working() {
            self.spawn_worker(&mut state)?;
        }
        drop(state);

        self.shared.available.notify_one();
        Ok(())
    }

    fn is_working(&self) -> bool {
        self.shared.is_working()
    }

    fn is_alive(&self) -> bool {
        self.shared.lock_state().worker.is_some()
    }

    fn destroy(&self) {
        self.shared.destroy();
    }

    fn size(&self) -> usize {
        self.shared.lock_state().fifo.len()
    }
}

impl<K, V> Drop for SingleEventQueue<K, V> {
    fn drop(&mut self) {
        // The worker holds its own reference to the shared state; stop it with the queue
        self.shared.working.store(false, Ordering::Release);
        let mut state = recover_poison(self.shared.state.lock(), "worker state");
        if let Some(worker) = state.worker.take() {
            worker.interrupt.trigger();
        }
        drop(state);
        self.shared.available.notify_all();
    }
}

impl<K: CacheKey, V: CacheValue> std::fmt::Debug for SingleEventQueue<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleEventQueue")
            .field("binding", &self.shared.binding)
            .field("working", &self.is_working())
            .finish()
    }
}

impl<K: CacheKey, V: CacheValue> std::fmt::Display for SingleEventQueue<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.shared.binding)
    }
}
