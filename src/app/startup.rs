//! Application startup for the `ceq` binary

use crate::app::cli::display::print_stats;
use crate::app::cli::Args;
use crate::app::demo::{run_demo, DemoOptions};
use crate::config::Config;
use crate::core::logging::init_logging;
use crate::core::styles::palette_to_clap;
use crate::pool::ThreadPoolManager;
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::time::Duration;

/// Exit status when the queue is still working at the end of the run
pub const EXIT_OK: i32 = 0;
/// Exit status for configuration, logging, or queue construction errors
pub const EXIT_CONFIG_ERROR: i32 = 1;
/// Exit status when the queue was poisoned during the run
pub const EXIT_POISONED: i32 = 2;

fn parse_args() -> Args {
    let help_color = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
    let matches = Args::command()
        .styles(palette_to_clap(help_color))
        .get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Run the application and return its exit status
pub fn startup() -> i32 {
    let args = parse_args();

    let mut config = match Config::load(args.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ceq: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };
    args.apply_to(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("ceq: {}", e);
        return EXIT_CONFIG_ERROR;
    }

    let use_color = args.use_color(config.logging.color);
    if let Err(e) = init_logging(
        config.logging.level.as_deref(),
        config.logging.format.as_deref(),
        config.logging.file.as_deref(),
        use_color,
    ) {
        eprintln!("ceq: failed to initialise logging: {}", e);
        return EXIT_CONFIG_ERROR;
    }
    log::debug!("Effective configuration: {:?}", config);

    ThreadPoolManager::configure_global(config.thread_pools.clone());
    let pools = ThreadPoolManager::global();

    let options = DemoOptions {
        events: args.events,
        fail_first: args.fail_first,
        drain_timeout: Duration::from_millis(args.drain_timeout_ms),
    };
    let report = match run_demo(&config, options, pools) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Could not create event queue: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };
    pools.dispose();

    if let Err(e) = print_stats(&report.stats, args.json_output(), use_color) {
        log::error!("Could not render statistics: {}", e);
    }

    if report.working {
        EXIT_OK
    } else {
        EXIT_POISONED
    }
}
