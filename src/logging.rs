//! Logging setup. The terminal belongs to the UI, so logs go to a file.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "FIXBASE_LOG";

pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("fixbase").join("fixbase.log"))
}

/// Install the global subscriber, appending to the log file.
pub fn init(default_filter: &str) -> Result<PathBuf> {
    let path = log_path().context("Could not find cache directory")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(path)
}
