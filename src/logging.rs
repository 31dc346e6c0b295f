//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! Store transitions emit `debug` events for rejected operations and `info` events for loads,
//! saves and resets. The filter can be overridden with the `JDEX_LOG` environment variable,
//! using the usual `EnvFilter` directive syntax.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives that replace the configured level.
pub const LOG_ENV: &str = "JDEX_LOG";

#[derive(Debug, Clone)]
/// Where log events go and how many of them.
pub struct LogConfig {
    /// Most verbose level emitted.
    pub level: LevelFilter,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    #[must_use]
    /// Maps a `-v` count to a level: none gives warnings only, three or more gives trace.
    pub fn from_verbosity(verbosity: u8, log_file: Option<PathBuf>) -> Self {
        let level = match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        Self { level, log_file }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        builder.with_writer(io::stderr).try_init()
    };

    installed.map_err(|e| Error::Logging(e.to_string()))
}
