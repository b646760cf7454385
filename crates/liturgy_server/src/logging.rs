use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::ServerConfig;

/// Prefix of the daily log files, e.g. `liturgy.2026-10-19`.
const LOG_FILE_PREFIX: &str = "liturgy";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initializes console logging, plus a daily-rolling file when
/// `config.log_dir` is set.
///
/// Returns the file writer's guard, which must be kept alive for the
/// duration of the process; `None` when logging to the console only.
pub fn init_logging(config: &ServerConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(logs_dir) => {
            std::fs::create_dir_all(logs_dir)?;
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.log_filter))
        .with(file_layer)
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}
