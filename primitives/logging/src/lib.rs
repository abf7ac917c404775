#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for the RPC client.
//!
//! Every crate logs through `tracing`. This crate holds the small `trace`
//! helper used at construction sites and [`init`], which installs a
//! `tracing-subscriber` formatter for binaries and test harnesses that want
//! to see those events.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use config::LoggingConfig;
use thiserror::Error;
use tracing::Level;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level is not one of trace, debug, info, warn, error.
    #[error("Invalid log level: {0:?}")]
    InvalidLevel(String),
    /// The log file could not be opened for appending.
    #[error("Failed to open log file {path}: {source}")]
    File {
        /// Path from the configuration.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Emits a trace event tagged with the calling module.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(target: "bitcoind_rpc", module, "{}", msg);
}

/// Installs a global fmt subscriber at the configured level.
///
/// Logs go to the configured file, appending, or to stderr. Returns
/// `Ok(false)` when a global subscriber was already installed, which leaves
/// the existing one in place.
pub fn init(config: &LoggingConfig) -> Result<bool, LoggingError> {
    let level: Level =
        config.level.parse().map_err(|_| LoggingError::InvalidLevel(config.level.clone()))?;
    let builder = tracing_subscriber::fmt().with_max_level(level);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File { path: path.clone(), source })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init().is_ok()
        }
        None => builder.with_writer(std::io::stderr).try_init().is_ok(),
    };
    Ok(installed)
}
