use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::AppError;

/// Installs a file-backed tracing subscriber. The terminal belongs to the UI,
/// so nothing is written to stdout or stderr.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), AppError> {
    if let Some(parent) = config.file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let filter = EnvFilter::try_from_env("TIMETABLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
