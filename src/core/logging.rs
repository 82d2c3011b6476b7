//! Logging setup for the `ceq` binary and for library consumers that want the same output
//!
//! The library itself only emits records through the `log` facade. This module installs
//! `flexi_logger` with a compact level-abbreviated format, an extended format that adds the
//! source location, and a JSON format with one object per line.

use crate::config::ConfigError;

// Global static logger handle for flexi_logger
static LOGGER_HANDLE: std::sync::OnceLock<std::sync::Mutex<flexi_logger::LoggerHandle>> =
    std::sync::OnceLock::new();

/// Supported log output formats
pub const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

/// Install the global logger
///
/// `log_level` accepts any flexi_logger spec ("info", "debug, cache_event_queue::pool=trace").
/// `log_format` is one of [`LOG_FORMATS`]; unknown values fall back to "text".
pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&std::path::Path>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let format: flexi_logger::FormatFunction = match (log_format.unwrap_or("text"), color_enabled) {
        ("json", _) => json_format,
        ("ext", true) => extended_color_format,
        ("ext", false) => extended_format,
        (_, true) => simple_color_format,
        (_, false) => simple_format,
    };

    let mut logger = Logger::try_with_str(log_level.unwrap_or("info"))?.format(format);
    if let Some(file_path) = log_file {
        logger = logger.log_to_file(FileSpec::try_from(file_path)?);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(std::sync::Mutex::new(handle));

    Ok(())
}

/// Change the active log level at runtime
///
/// Only the level can change after initialisation; format and file output are fixed
/// when the logger starts.
pub fn reconfigure_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handle_mutex = LOGGER_HANDLE
        .get()
        .ok_or("Logger handle not initialised. Call init_logging first.")?;
    let mut handle = handle_mutex
        .lock()
        .map_err(|_| "Could not acquire logger handle lock")?;
    handle.parse_and_push_temp_spec(log_level)?;
    Ok(())
}

/// Validate a format name before the logger is started
pub fn validate_log_format(format: &str) -> Result<(), ConfigError> {
    if LOG_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: "log-format".to_string(),
            message: format!("unknown format '{}', expected one of {:?}", format, LOG_FORMATS),
        })
    }
}

type FormatResult = Result<(), std::io::Error>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Layout knobs shared by the line-oriented formats
#[derive(Debug, Clone, Copy)]
struct LineLayout {
    location: bool,
    color: bool,
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    let abbr = level_abbr(level);
    match level {
        log::Level::Error => abbr.red().bold(),
        log::Level::Warn => abbr.yellow(),
        log::Level::Info => abbr.green(),
        log::Level::Debug => abbr.blue(),
        log::Level::Trace => abbr.magenta(),
    }
}

// "2025-01-31 12:00:00.123 INF message" plus " (queue/single.rs:42)" when located
fn write_line(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
    layout: LineLayout,
) -> FormatResult {
    use colored::Colorize;

    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    if layout.color {
        write!(
            w,
            "{} {} {}",
            timestamp.dimmed(),
            level_colored(record.level()),
            record.args()
        )?;
    } else {
        write!(w, "{} {} {}", timestamp, level_abbr(record.level()), record.args())?;
    }

    if layout.location {
        let location = source_location(record.target(), record.line());
        if layout.color {
            write!(w, " ({})", location.dimmed())?;
        } else {
            write!(w, " ({})", location)?;
        }
    }
    Ok(())
}

fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> FormatResult {
    write_line(w, now, record, LineLayout { location: false, color: false })
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> FormatResult {
    write_line(w, now, record, LineLayout { location: false, color: true })
}

fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> FormatResult {
    write_line(w, now, record, LineLayout { location: true, color: false })
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> FormatResult {
    write_line(w, now, record, LineLayout { location: true, color: true })
}

/// One log record as a JSON object
#[derive(serde::Serialize)]
struct JsonRecord<'a> {
    timestamp: String,
    level: &'static str,
    message: String,
    target: String,
    thread: &'a str,
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> FormatResult {
    let current = std::thread::current();
    let line = JsonRecord {
        timestamp: now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        level: level_abbr(record.level()),
        message: record.args().to_string(),
        target: source_location(record.target(), record.line()),
        thread: current.name().unwrap_or("unnamed"),
    };
    serde_json::to_writer(w, &line)?;
    Ok(())
}

// cache_event_queue::queue::single -> queue/single.rs, other crates keep their module path
fn source_location(target: &str, line: Option<u32>) -> String {
    let path = match target.strip_prefix("cache_event_queue::") {
        Some(module) => format!("{}.rs", module.replace("::", "/")),
        None => target.replace("::", "/"),
    };
    match line {
        Some(line) => format!("{}:{}", path, line),
        None => path,
    }
}
