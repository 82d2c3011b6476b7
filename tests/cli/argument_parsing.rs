//! CLI argument parsing tests

use cache_event_queue::app::cli::Args;
use cache_event_queue::config::Config;
use cache_event_queue::queue::QueueType;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_defaults_leave_config_untouched() {
    let args = Args::try_parse_from(["ceq"]).unwrap();
    let mut config = Config::default();
    args.apply_to(&mut config);

    assert_eq!(config, Config::default());
    assert_eq!(args.events, 10);
    assert_eq!(args.fail_first, 0);
    assert!(!args.json_output());
}

#[test]
fn test_queue_flags_override_config() {
    let args = Args::try_parse_from([
        "ceq",
        "--queue-type",
        "pooled",
        "--pool",
        "replication",
        "--max-failure",
        "5",
        "--retry-delay-ms",
        "20",
        "--wait-to-die-ms",
        "100",
    ])
    .unwrap();
    let mut config = Config::default();
    args.apply_to(&mut config);

    let settings = &config.event_queue;
    assert_eq!(settings.queue_type, QueueType::Pooled);
    assert_eq!(settings.pool_name.as_deref(), Some("replication"));
    assert_eq!(settings.max_failure, 5);
    assert_eq!(settings.wait_before_retry_ms, 20);
    assert_eq!(settings.wait_to_die_ms, 100);
}

#[test]
fn test_logging_flags_override_config() {
    let args = Args::try_parse_from([
        "ceq",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--log-file",
        "ceq.log",
        "--no-color",
    ])
    .unwrap();
    let mut config = Config::default();
    args.apply_to(&mut config);

    assert_eq!(config.logging.level.as_deref(), Some("debug"));
    assert_eq!(config.logging.format.as_deref(), Some("json"));
    assert_eq!(config.logging.file, Some(PathBuf::from("ceq.log")));
    assert_eq!(config.logging.color, Some(false));
    assert!(!args.use_color(Some(true)));
}

#[test]
fn test_rejects_unknown_queue_type() {
    assert!(Args::try_parse_from(["ceq", "--queue-type", "clustered"]).is_err());
}

#[test]
fn test_color_flags_conflict() {
    assert!(Args::try_parse_from(["ceq", "--color", "--no-color"]).is_err());
}

#[test]
fn test_json_output_format() {
    let args = Args::try_parse_from(["ceq", "--format", "json", "-n", "3"]).unwrap();
    assert!(args.json_output());
    assert_eq!(args.events, 3);
}

#[test]
fn test_long_version_reports_stats_schema() {
    let err = Args::try_parse_from(["ceq", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    let rendered = err.to_string();
    assert!(rendered.contains(env!("CARGO_PKG_VERSION")));
    assert!(rendered.contains("stats schema"));
}
