//! Tracing setup.
//!
//! The TUI owns the terminal, so in that mode logs go to a file in the data
//! directory. Headless mode logs to stderr, keeping stdout for the protocol.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "fantasify=info,fantasify_core=info";
const LOG_FILE: &str = "fantasify.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to `fantasify.log` under `data_dir`.
///
/// The returned guard must be kept alive until exit so buffered lines are
/// flushed.
pub fn init_tui(data_dir: &Path) -> WorkerGuard {
    if !data_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            eprintln!("Failed to create data directory: {e}");
        }
    }

    let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

/// Log to stderr.
pub fn init_headless() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
