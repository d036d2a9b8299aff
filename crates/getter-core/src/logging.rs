//! Tracing setup for the `getter` binary.
//!
//! Events go to `$XDG_STATE_HOME/getter/getter.log` (append, no ANSI). When
//! the state dir can't be used the CLI calls [`init_logging_stderr`] instead.
//! `RUST_LOG` overrides [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,getter=debug,getter_core=debug";

const LOG_FILE_NAME: &str = "getter.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Directory holding `getter.log`.
pub fn log_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("getter")?;
    Ok(xdg_dirs.get_state_home().join("getter"))
}

/// Create `dir` if needed and open `dir/getter.log` for appending.
fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log dir {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    Ok((file, path))
}

/// Install the global subscriber writing to the state-dir log file.
/// Returns the log path; on any failure nothing is installed.
pub fn init_logging() -> Result<PathBuf> {
    let (file, path) = open_log_file(&log_dir()?)?;

    // Every event locks the file for its single write.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("logging to {}", path.display());
    Ok(path)
}

/// Install a stderr subscriber. A subscriber that is already set wins.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
