//! Taskgraph - Target task selection CLI

mod cli;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

/// Targets recorded in the debug log file
const FILE_LOG_FILTER: &str =
    "taskgraph=debug,taskgraph_core=debug,taskgraph_tasks=debug,taskgraph_targets=debug";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.quiet);
    cli.execute()
}

/// Console logs go to stderr at `warn`, or `error` with `--quiet`, unless
/// `RUST_LOG` is set. Selection decisions are also kept at debug level in a
/// daily JSON file when a log directory is available.
fn init_tracing(quiet: bool) -> Option<WorkerGuard> {
    let console_level = if quiet { "error" } else { "warn" };
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_level)));

    let (file, guard) = match log_directory() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "taskgraph.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_LOG_FILTER));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

/// `TASKGRAPH_LOG_DIR`, else `~/.taskgraph/logs`; created if missing
fn log_directory() -> Option<PathBuf> {
    let dir = match std::env::var_os("TASKGRAPH_LOG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()?.join(".taskgraph").join("logs"),
    };
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
