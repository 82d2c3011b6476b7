//! Configuration file tests combined with command line overrides

use cache_event_queue::app::cli::Args;
use cache_event_queue::app::demo::{run_demo, DemoOptions};
use cache_event_queue::config::{Config, ConfigError};
use cache_event_queue::pool::ThreadPoolManager;
use cache_event_queue::queue::QueueType;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_command_line_overrides_file() {
    let file = config_file(
        r#"
        [event-queue]
        queue-type = "pooled"
        pool-name = "replication"
        max-failure = 4
        "#,
    );
    let path = file.path().to_string_lossy().to_string();
    let args = Args::try_parse_from(["ceq", "-c", &path, "--max-failure", "7"]).unwrap();

    let mut config = Config::load(args.config_file.as_deref()).unwrap();
    args.apply_to(&mut config);
    config.validate().unwrap();

    assert_eq!(config.event_queue.queue_type, QueueType::Pooled);
    assert_eq!(config.event_queue.pool_name.as_deref(), Some("replication"));
    assert_eq!(config.event_queue.max_failure, 7);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let args = Args::try_parse_from(["ceq", "-c", "/nonexistent/ceq/config.toml"]).unwrap();
    let result = Config::load(args.config_file.as_deref());
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn test_invalid_override_fails_validation() {
    let file = config_file("[event-queue]\nmax-failure = 2\n");
    let path = file.path().to_string_lossy().to_string();
    let args = Args::try_parse_from(["ceq", "-c", &path, "--max-failure", "0"]).unwrap();

    let mut config = Config::load(args.config_file.as_deref()).unwrap();
    args.apply_to(&mut config);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_pooled_demo_from_file() {
    let file = config_file(
        r#"
        [event-queue]
        queue-type = "pooled"
        pool-name = "demo-pool"
        wait-before-retry-ms = 0

        [thread-pools.demo-pool]
        pool-size = 2
        "#,
    );
    let path = file.path().to_string_lossy().to_string();
    let args = Args::try_parse_from(["ceq", "-c", &path, "-n", "6"]).unwrap();

    let mut config = Config::load(args.config_file.as_deref()).unwrap();
    args.apply_to(&mut config);
    config.validate().unwrap();

    let pools = ThreadPoolManager::new(config.thread_pools.clone());
    let report = run_demo(
        &config,
        DemoOptions {
            events: args.events,
            fail_first: args.fail_first,
            drain_timeout: Duration::from_secs(10),
        },
        &pools,
    )
    .unwrap();
    pools.dispose();

    assert!(report.working);
    assert_eq!(report.expected, 9);
    assert_eq!(report.delivered, 9);
    assert_eq!(pools.settings_for("demo-pool").pool_size, 2);
}
