use anyhow::{Context, Result};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "crm-admin.log";

/// Installs the global subscriber: everything `RUST_LOG` allows goes to a daily log file
/// under `logs_dir`, warnings (or debug with `verbose`) also go to stderr.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(logs_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(logs_dir)
        .with_context(|| format!("Failed to open log directory {}", logs_dir.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(stderr_level),
        )
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}
