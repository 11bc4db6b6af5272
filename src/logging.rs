//! Logging setup for the crawler binary
//!
//! Events go to two sinks with the same filter:
//! - stderr, for the operator
//! - `<log_dir>/<store>_<YYYYmmdd_HHMMSS>.log`, one file per run
//!
//! The library itself only emits `tracing` events and never installs a
//! subscriber; `init_logging` is called once by `main` before anything else.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the file writer alive; dropping it flushes pending log lines
#[must_use = "dropping the guard stops writing to the log file"]
pub struct LogGuard {
    _worker: WorkerGuard,
    log_file: PathBuf,
}

impl LogGuard {
    /// Path of this run's log file
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// File name of the log of a run started at `started` for `store`
pub fn log_file_name(store: &str, started: DateTime<Local>) -> String {
    format!("{}_{}.log", store, started.format("%Y%m%d_%H%M%S"))
}

/// Filter directive for the requested verbosity
///
/// `RUST_LOG`, when set, takes precedence over this.
pub fn filter_directive(debug: bool, quiet: bool) -> &'static str {
    if quiet {
        // Only show errors
        "error"
    } else if debug {
        "storefront_crawler=debug,info"
    } else {
        "storefront_crawler=info,warn"
    }
}

/// Installs the console and file subscribers
///
/// # Arguments
///
/// * `log_dir` - Directory for the run's log file, created if absent
/// * `store` - Store being crawled, used in the file name
/// * `debug` - Include per-item extraction and write details
/// * `quiet` - Only report errors
pub fn init_logging(log_dir: &Path, store: &str, debug: bool, quiet: bool) -> Result<LogGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_name = log_file_name(store, Local::now());
    let log_file = log_dir.join(&file_name);

    let appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (file_writer, worker) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("failed to install the log subscriber")?;

    Ok(LogGuard {
        _worker: worker,
        log_file,
    })
}
