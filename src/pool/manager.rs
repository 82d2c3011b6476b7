//! Process-wide registry of named thread pools

use crate::config::{ThreadPoolSettings, DEFAULT_POOL_NAME};
use crate::core::sync::{lock_or_queue_error, recover_poison};
use crate::pool::thread_pool::ThreadPool;
use crate::queue::error::{QueueError, QueueResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, OnceLock};

static GLOBAL_MANAGER: OnceLock<ThreadPoolManager> = OnceLock::new();

/// Creates pools lazily by name and hands out shared references to them
#[derive(Debug)]
pub struct ThreadPoolManager {
    settings: BTreeMap<String, ThreadPoolSettings>,
    pools: Mutex<HashMap<String, Arc<ThreadPool>>>,
}

impl Default for ThreadPoolManager {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl ThreadPoolManager {
    /// Create a manager from per-pool settings keyed by pool name
    pub fn new(settings: BTreeMap<String, ThreadPoolSettings>) -> Self {
        Self {
            settings,
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide manager, built with default settings unless configured first
    pub fn global() -> &'static ThreadPoolManager {
        GLOBAL_MANAGER.get_or_init(ThreadPoolManager::default)
    }

    /// Configure the process-wide manager
    ///
    /// Returns `false` (and leaves the existing manager untouched) when the global manager
    /// has already been created.
    pub fn configure_global(settings: BTreeMap<String, ThreadPoolSettings>) -> bool {
        let configured = GLOBAL_MANAGER.set(ThreadPoolManager::new(settings)).is_ok();
        if !configured {
            log::warn!("Thread pool manager already initialised; new settings ignored");
        }
        configured
    }

    /// Settings used for `pool_name`
    pub fn settings_for(&self, pool_name: &str) -> ThreadPoolSettings {
        self.settings
            .get(pool_name)
            .or_else(|| self.settings.get(DEFAULT_POOL_NAME))
            .cloned()
            .unwrap_or_default()
    }

    /// Get the pool called `pool_name`, starting it on first use
    ///
    /// A pool that has been shut down is replaced by a fresh one.
    pub fn get_pool(&self, pool_name: &str) -> QueueResult<Arc<ThreadPool>> {
        if pool_name.is_empty() {
            return Err(QueueError::PoolNameRequired);
        }

        let mut pools = lock_or_queue_error(self.pools.lock(), "thread pools")?;

        if let Some(pool) = pools.get(pool_name) {
            if !pool.is_shutdown() {
                return Ok(Arc::clone(pool));
            }
            log::debug!("Thread pool '{}' was shut down; starting a new one", pool_name);
        }

        let pool = Arc::new(ThreadPool::new(pool_name, self.settings_for(pool_name))?);
        pools.insert(pool_name.to_string(), Arc::clone(&pool));
        Ok(pool)
    }

    /// Names of the pools started so far, sorted
    pub fn pool_names(&self) -> Vec<String> {
        let pools = recover_poison(self.pools.lock(), "thread pools");
        let mut names: Vec<String> = pools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Gracefully shut down every pool and forget them
    pub fn dispose(&self) {
        let pools: Vec<Arc<ThreadPool>> = recover_poison(self.pools.lock(), "thread pools")
            .drain()
            .map(|(_, pool)| pool)
            .collect();

        for pool in pools {
            pool.shutdown();
        }
    }
}
