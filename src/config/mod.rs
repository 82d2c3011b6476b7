//! TOML configuration file parsing and loading
//!
//! This module handles loading and parsing of the configuration file, including
//! default config file discovery and validation of config values.
//!
//! ```toml
//! [event-queue]
//! queue-type = "pooled"
//! max-failure = 3
//! wait-before-retry-ms = 500
//! wait-to-die-ms = 10000
//! pool-name = "replication"
//!
//! [thread-pools.replication]
//! pool-size = 8
//! use-boundary = true
//! boundary-size = 2000
//! when-blocked = "discard_oldest"
//!
//! [logging]
//! level = "info"
//! format = "ext"
//! ```

use crate::core::logging::validate_log_format;
use crate::core::retry::RetryPolicy;
use crate::pool::WhenBlockedPolicy;
use crate::queue::QueueType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the pool whose settings apply to pools without their own section
pub const DEFAULT_POOL_NAME: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Settings for one event queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EventQueueSettings {
    pub queue_type: QueueType,
    /// Failures tolerated per event before the queue is poisoned
    pub max_failure: u32,
    pub wait_before_retry_ms: u64,
    /// Idle time before a SINGLE queue's worker thread exits
    pub wait_to_die_ms: u64,
    /// Shared pool used by POOLED queues
    pub pool_name: Option<String>,
}

impl Default for EventQueueSettings {
    fn default() -> Self {
        Self {
            queue_type: QueueType::Single,
            max_failure: 3,
            wait_before_retry_ms: 500,
            wait_to_die_ms: 10_000,
            pool_name: None,
        }
    }
}

impl EventQueueSettings {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn pooled(pool_name: impl Into<String>) -> Self {
        Self {
            queue_type: QueueType::Pooled,
            pool_name: Some(pool_name.into()),
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, max_failure: u32, wait_before_retry_ms: u64) -> Self {
        self.max_failure = max_failure;
        self.wait_before_retry_ms = wait_before_retry_ms;
        self
    }

    pub fn with_wait_to_die_ms(mut self, wait_to_die_ms: u64) -> Self {
        self.wait_to_die_ms = wait_to_die_ms;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(self)
    }

    pub fn wait_to_die(&self) -> Duration {
        Duration::from_millis(self.wait_to_die_ms.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_failure < 1 {
            return Err(invalid("max-failure", "must be at least 1"));
        }
        if self.wait_to_die_ms < 1 {
            return Err(invalid("wait-to-die-ms", "must be at least 1"));
        }
        if self.queue_type == QueueType::Pooled
            && self.pool_name.as_deref().map_or(true, str::is_empty)
        {
            return Err(invalid("pool-name", "a pooled queue needs a pool name"));
        }
        Ok(())
    }
}

impl From<&EventQueueSettings> for RetryPolicy {
    fn from(settings: &EventQueueSettings) -> Self {
        RetryPolicy::new(
            settings.max_failure,
            Duration::from_millis(settings.wait_before_retry_ms),
        )
    }
}

/// Settings for one named thread pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThreadPoolSettings {
    pub pool_size: usize,
    /// Bound the pending-task queue to `boundary_size`
    pub use_boundary: bool,
    pub boundary_size: usize,
    pub when_blocked: WhenBlockedPolicy,
}

impl Default for ThreadPoolSettings {
    fn default() -> Self {
        Self {
            pool_size: 4,
            use_boundary: true,
            boundary_size: 2000,
            when_blocked: WhenBlockedPolicy::Abort,
        }
    }
}

impl ThreadPoolSettings {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_boundary(mut self, boundary_size: usize, when_blocked: WhenBlockedPolicy) -> Self {
        self.use_boundary = true;
        self.boundary_size = boundary_size;
        self.when_blocked = when_blocked;
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.use_boundary = false;
        self
    }

    /// Capacity of the pending-task queue, `None` when unbounded
    pub fn boundary(&self) -> Option<usize> {
        self.use_boundary.then_some(self.boundary_size)
    }

    pub fn validate(&self, pool_name: &str) -> Result<(), ConfigError> {
        if self.pool_size < 1 {
            return Err(invalid(
                &format!("thread-pools.{}.pool-size", pool_name),
                "must be at least 1",
            ));
        }
        if self.use_boundary && self.boundary_size < 1 {
            return Err(invalid(
                &format!("thread-pools.{}.boundary-size", pool_name),
                "must be at least 1 when use-boundary is set",
            ));
        }
        Ok(())
    }
}

/// Logging options that can come from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<PathBuf>,
    pub color: Option<bool>,
}

/// Complete configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub event_queue: EventQueueSettings,
    pub thread_pools: BTreeMap<String, ThreadPoolSettings>,
    pub logging: LoggingSettings,
}

impl Config {
    /// Parse and validate configuration text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cache-event-queue").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicitly given path must exist. Without one, the default location is used when
    /// a file exists there; otherwise built-in defaults apply.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => Self::default_path().filter(|path| path.exists()),
        };

        match config_path {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                let contents =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Self::from_toml_str(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.event_queue.validate()?;
        for (name, pool) in &self.thread_pools {
            pool.validate(name)?;
        }
        if let Some(format) = self.logging.format.as_deref() {
            validate_log_format(format)?;
        }
        Ok(())
    }

    /// Settings for `pool_name`, falling back to the `default` pool section
    pub fn pool_settings(&self, pool_name: &str) -> ThreadPoolSettings {
        self.thread_pools
            .get(pool_name)
            .or_else(|| self.thread_pools.get(DEFAULT_POOL_NAME))
            .cloned()
            .unwrap_or_default()
    }
}
