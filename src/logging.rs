//! File-backed tracing setup. The terminal belongs to the header, so logs
//! never go to stdout or stderr while it runs.

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "dataset_header=info";
const VERBOSE_LOG_FILTER: &str = "dataset_header=debug";
const LOG_FILE_NAME: &str = "dataset-header.log";

pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Returns the path being written to.
pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<PathBuf> {
    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))?;

    Ok(path)
}
