use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{BookingError, Result};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.dir)?;

    let file_appender = tracing_appender::rolling::daily(&config.dir, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    // RUST_LOG wins over the configured default
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| {
            BookingError::Config(format!("Invalid log filter '{}': {}", config.filter, e))
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| BookingError::Config(format!("Logging already initialized: {e}")))?;

    Ok(guard)
}
