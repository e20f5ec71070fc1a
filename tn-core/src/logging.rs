//! Structured logging setup using the `tracing` ecosystem.
//!
//! Console output goes to stderr; a copy goes to a daily-rotated file
//! under the configured log directory, as text or JSON.

use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling;

use crate::config::AppConfig;
use crate::error::{TnError, TnResult};

const LOG_FILE_PREFIX: &str = "tinode-store.log";

/// Initialize the global tracing subscriber from `config.logging`.
///
/// `level_override` replaces the configured level (the CLI's `--verbose`).
/// Fails if the log directory cannot be resolved or created, or if a
/// global subscriber is already installed.
pub fn init_logging(config: &AppConfig, level_override: Option<&str>) -> TnResult<LogGuard> {
    let log_dir = log_directory(config)?;
    let level = effective_level(config, level_override);

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    // Exactly one of these is Some.
    let (json_layer, text_layer) = if config.logging.json_output {
        let layer = fmt::layer()
            .with_writer(writer)
            .json()
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(level_filter(level))
        .with(console_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TnError::Config(format!("failed to install logger: {e}")))?;

    tracing::info!(level, dir = %log_dir.display(), "logging initialized");

    Ok(LogGuard { _guard: guard })
}

/// Keeps the non-blocking file writer alive; dropping it flushes the log.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Console-only logger for when the log directory is unavailable.
/// A no-op if a subscriber is already installed.
pub fn init_console_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(level_filter(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init();
}

fn log_directory(config: &AppConfig) -> TnResult<PathBuf> {
    let dir = config.effective_log_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn effective_level<'a>(config: &'a AppConfig, level_override: Option<&'a str>) -> &'a str {
    level_override.unwrap_or(config.logging.level.as_str())
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}
