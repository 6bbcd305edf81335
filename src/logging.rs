//! Tracing subscriber setup.
//!
//! Log records go to stdout and, without ANSI colours, to an append-only
//! file. The file writer is non-blocking; keep the returned guard alive for
//! as long as records should be flushed.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ServiceError};

/// Filter used when `--verbose` is given.
pub const VERBOSE_FILTER: &str = "dice_service=debug,tower_http=debug,info";

/// Pick the log filter: verbose wins, then `RUST_LOG`, then the configured level.
pub fn build_filter(verbose: bool, default_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    }
}

/// Open the log file for appending, creating parent directories as needed.
pub fn open_log_file(path: &Path) -> Result<fs::File> {
    let log_file_error = |source| ServiceError::LogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(log_file_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_file_error)
}

/// Install the global subscriber writing to stdout and `log_path`.
pub fn init_logging(log_path: &Path, filter: EnvFilter) -> Result<WorkerGuard> {
    let file = open_log_file(log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter)
        .init();

    Ok(guard)
}
