//! Fixed-size worker pool draining a shared task FIFO

use crate::config::ThreadPoolSettings;
use crate::core::shutdown::Interrupt;
use crate::core::sync::{lock_or_queue_error, recover_poison};
use crate::pool::WhenBlockedPolicy;
use crate::queue::error::{QueueError, QueueResult};
use crate::stats::Stats;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

/// A unit of work; receives the pool's interrupt so long waits can be cut short
pub type Task = Box<dyn FnOnce(&Interrupt) + Send + 'static>;

struct PoolState {
    tasks: VecDeque<Task>,
    /// Tasks currently running on a worker
    active: usize,
    shutdown: bool,
}

struct PoolShared {
    name: String,
    settings: ThreadPoolSettings,
    state: Mutex<PoolState>,
    available: Condvar,
    interrupt: Interrupt,
}

impl PoolShared {
    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        // Tasks run outside the lock and behind catch_unwind, so a poisoned guard still
        // holds consistent state
        recover_poison(self.state.lock(), "pool state")
    }

    fn run_task(&self, task: Task) {
        if panic::catch_unwind(AssertUnwindSafe(|| task(&self.interrupt))).is_err() {
            log::error!("Task panicked on a worker of thread pool '{}'", self.name);
        }
    }
}

/// Named pool of OS threads shared by many event queues
///
/// Tasks are picked up in submission order, but with more than one worker they
/// complete in any order.
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadPool {
    /// Start `settings.pool_size` workers named `<name>-worker-<n>`
    pub fn new(name: impl Into<String>, settings: ThreadPoolSettings) -> QueueResult<Self> {
        let name = name.into();
        let pool_size = settings.pool_size.max(1);
        let shared = Arc::new(PoolShared {
            name: name.clone(),
            settings,
            state: Mutex::new(PoolState {
                tasks: VecDeque::new(),
                active: 0,
                shutdown: false,
            }),
            available: Condvar::new(),
            interrupt: Interrupt::new(),
        });

        log::debug!(
            "Starting thread pool '{}' with {} workers (boundary: {:?}, when blocked: {})",
            name,
            pool_size,
            shared.settings.boundary(),
            shared.settings.when_blocked
        );

        let pool = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(pool_size)),
        };

        for i in 0..pool_size {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("{}-worker-{}", name, i))
                .spawn(move || Self::worker_loop(shared))
                .map_err(|e| {
                    // Stop the workers that did start
                    pool.stop_accepting();
                    QueueError::ThreadSpawn {
                        message: format!("thread pool '{}': {}", name, e),
                    }
                })?;
            lock_or_queue_error(pool.workers.lock(), "pool workers")?.push(handle);
        }

        Ok(pool)
    }

    fn worker_loop(shared: Arc<PoolShared>) {
        loop {
            let task = {
                let mut state = shared.lock_state();
                loop {
                    if let Some(task) = state.tasks.pop_front() {
                        state.active += 1;
                        break task;
                    }
                    if state.shutdown {
                        log::trace!("Worker of thread pool '{}' exiting", shared.name);
                        return;
                    }
                    state = recover_poison(shared.available.wait(state), "pool state");
                }
            };

            shared.run_task(task);

            shared.lock_state().active -= 1;
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn pool_size(&self) -> usize {
        self.shared.settings.pool_size.max(1)
    }

    pub fn settings(&self) -> &ThreadPoolSettings {
        &self.shared.settings
    }

    /// Submit a task
    ///
    /// Never waits for space in a full queue: the pool's [`WhenBlockedPolicy`] decides
    /// whether the task is rejected, replaces the oldest pending task, or runs on the calling
    /// thread. With [`WhenBlockedPolicy::Run`] the caller blocks until that task returns,
    /// including any retry pauses inside it.
    pub fn execute(&self, task: Task) -> QueueResult<()> {
        let mut state = lock_or_queue_error(self.shared.state.lock(), "pool state")?;

        if state.shutdown {
            return Err(QueueError::PoolShutdown {
                name: self.shared.name.clone(),
            });
        }

        if let Some(capacity) = self.shared.settings.boundary() {
            if state.tasks.len() >= capacity {
                match self.shared.settings.when_blocked {
                    WhenBlockedPolicy::Abort => {
                        return Err(QueueError::Rejected {
                            pool: self.shared.name.clone(),
                            capacity,
                        });
                    }
                    WhenBlockedPolicy::DiscardOldest => {
                        state.tasks.pop_front();
                        log::warn!(
                            "Thread pool '{}' is full ({}); discarded oldest pending task",
                            self.shared.name,
                            capacity
                        );
                    }
                    WhenBlockedPolicy::Run => {
                        drop(state);
                        log::debug!(
                            "Thread pool '{}' is full ({}); running task on caller thread",
                            self.shared.name,
                            capacity
                        );
                        self.shared.run_task(task);
                        return Ok(());
                    }
                }
            }
        }

        state.tasks.push_back(task);
        drop(state);
        self.shared.available.notify_one();
        Ok(())
    }

    /// Number of tasks waiting for a worker
    pub fn pending(&self) -> usize {
        self.shared.lock_state().tasks.len()
    }

    /// Number of tasks currently running
    pub fn active(&self) -> usize {
        self.shared.lock_state().active
    }

    /// Configured bound of the pending queue, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.shared.settings.boundary()
    }

    /// Free slots in the pending queue, `None` when unbounded
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.capacity()
            .map(|capacity| capacity.saturating_sub(self.pending()))
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.lock_state().shutdown
    }

    fn stop_accepting(&self) -> bool {
        let mut state = self.shared.lock_state();
        let was_running = !state.shutdown;
        state.shutdown = true;
        drop(state);
        self.shared.available.notify_all();
        was_running
    }

    /// Stop immediately: reject new work, discard pending tasks, and interrupt running ones
    ///
    /// Returns the number of discarded tasks. Workers exit once their current task returns;
    /// they are not joined here, so this is safe to call from a pool worker.
    pub fn shutdown_now(&self) -> usize {
        let discarded = {
            let mut state = self.shared.lock_state();
            state.shutdown = true;
            let discarded = state.tasks.len();
            state.tasks.clear();
            discarded
        };
        self.shared.interrupt.trigger();
        self.shared.available.notify_all();

        log::debug!(
            "Thread pool '{}' shut down, {} pending tasks discarded",
            self.shared.name,
            discarded
        );
        discarded
    }

    /// Stop accepting work, let workers drain the pending tasks, and join them
    pub fn shutdown(&self) {
        self.stop_accepting();

        let handles: Vec<JoinHandle<()>> = recover_poison(self.workers.lock(), "pool workers")
            .drain(..)
            .collect();

        let current = thread::current().id();
        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                log::warn!("Worker of thread pool '{}' panicked", self.shared.name);
            }
        }
        log::debug!("Thread pool '{}' drained and stopped", self.shared.name);
    }

    pub fn statistics(&self) -> Stats {
        let mut stats = Stats::new("Thread Pool")
            .with("Pool Name", self.name())
            .with("Pool Size", self.pool_size())
            .with("Shutdown", self.is_shutdown())
            .with("Pending", self.pending())
            .with("Active", self.active());
        if let Some(capacity) = self.capacity() {
            stats.push("Queue Capacity", capacity);
            stats.push("Remaining Capacity", self.remaining_capacity().unwrap_or(0));
        }
        stats
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Workers finish the pending tasks and exit on their own
        self.stop_accepting();
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.shared.name)
            .field("settings", &self.shared.settings)
            .finish()
    }
}
