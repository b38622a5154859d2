//! File logging.
//!
//! The terminal belongs to the UI, so log records go to a file. Logging is off unless
//! `BFM_LOG` names a level (`error`, `warn`, `info`, `debug`, `trace`).

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;

/// `BFM_LOG_FILE`, else `<cache dir>/bfm/bfm.log`.
pub fn log_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("BFM_LOG_FILE") {
        return PathBuf::from(path);
    }
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("bfm/bfm.log")
}

/// Parses a `BFM_LOG` value. Unknown values fall back to `info`.
pub fn parse_level(value: &str) -> Level {
    value.trim().parse().unwrap_or(Level::INFO)
}

/// Installs the file subscriber when `BFM_LOG` is set. Returns the log file in use.
pub fn init_logging() -> io::Result<Option<PathBuf>> {
    let Ok(value) = std::env::var("BFM_LOG") else {
        return Ok(None);
    };
    let level = parse_level(&value);
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bfm starting");
    Ok(Some(path))
}
