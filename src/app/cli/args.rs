//! Command line arguments for `ceq`
//!
//! Values given on the command line override the configuration file.

use crate::config::Config;
use crate::core::logging::LOG_FORMATS;
use crate::queue::QueueType;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

/// Output formats for the final statistics
pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Parser, Debug, Clone)]
#[command(name = "ceq")]
#[command(about = "Drive a cache event queue with synthetic events and report its statistics")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue backend
    #[arg(short = 't', long = "queue-type", value_name = "TYPE", value_parser = ["single", "pooled"])]
    pub queue_type: Option<String>,

    /// Thread pool name for the pooled backend
    #[arg(short = 'p', long = "pool", value_name = "NAME")]
    pub pool: Option<String>,

    /// Number of put events to enqueue
    #[arg(short = 'n', long = "events", value_name = "COUNT", default_value_t = 10)]
    pub events: u32,

    /// Listener calls that fail with a transient error before it recovers
    #[arg(short = 'F', long = "fail-first", value_name = "COUNT", default_value_t = 0)]
    pub fail_first: u32,

    /// Failures per event before the queue is poisoned
    #[arg(short = 'm', long = "max-failure", value_name = "COUNT")]
    pub max_failure: Option<u32>,

    /// Pause between delivery attempts
    #[arg(short = 'r', long = "retry-delay-ms", value_name = "MILLIS")]
    pub retry_delay_ms: Option<u64>,

    /// Idle time before a SINGLE queue's worker exits
    #[arg(long = "wait-to-die-ms", value_name = "MILLIS")]
    pub wait_to_die_ms: Option<u64>,

    /// How long to wait for the queue to drain
    #[arg(long = "drain-timeout-ms", value_name = "MILLIS", default_value_t = 30_000)]
    pub drain_timeout_ms: u64,

    /// Statistics output format
    #[arg(long = "format", value_name = "FORMAT", value_parser = OUTPUT_FORMATS, default_value = "text")]
    pub format: String,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = LOG_FORMATS)]
    pub log_format: Option<String>,

    /// Force coloured output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Override configuration values with the ones given on the command line
    pub fn apply_to(&self, config: &mut Config) {
        let settings = &mut config.event_queue;
        if let Some(queue_type) = self
            .queue_type
            .as_deref()
            .and_then(|name| QueueType::from_str(name).ok())
        {
            settings.queue_type = queue_type;
        }
        if let Some(pool) = &self.pool {
            settings.pool_name = Some(pool.clone());
        }
        if let Some(max_failure) = self.max_failure {
            settings.max_failure = max_failure;
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            settings.wait_before_retry_ms = retry_delay_ms;
        }
        if let Some(wait_to_die_ms) = self.wait_to_die_ms {
            settings.wait_to_die_ms = wait_to_die_ms;
        }

        let logging = &mut config.logging;
        if self.log_level.is_some() {
            logging.level = self.log_level.clone();
        }
        if self.log_format.is_some() {
            logging.format = self.log_format.clone();
        }
        if self.log_file.is_some() {
            logging.file = self.log_file.clone();
        }
        if self.color || self.no_color {
            logging.color = Some(self.color);
        }
    }

    /// Colour decision: explicit flags first, then the terminal
    pub fn use_color(&self, configured: Option<bool>) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            configured.unwrap_or_else(|| std::io::stdout().is_terminal())
        }
    }

    pub fn json_output(&self) -> bool {
        self.format == "json"
    }
}
