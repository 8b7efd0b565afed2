// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console and log-file tracing setup.

use std::path::Path;

use ragwatch_config::model::MonitorConfig;
use ragwatch_core::{RagwatchError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the log-file writer alive; drop it only at exit so buffered lines
/// are flushed.
pub struct LoggingGuard {
    _file: WorkerGuard,
}

/// Default filter: the configured level for ragwatch crates, `warn` elsewhere.
/// `RUST_LOG` takes precedence when set.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ragwatch={level},ragwatch_monitor={level},ragwatch_store={level},\
             ragwatch_report={level},ragwatch_prometheus={level},warn"
        ))
    })
}

/// Log to stderr and append to `monitor.log_file`.
pub fn init_logging(config: &MonitorConfig) -> Result<LoggingGuard> {
    let (dir, file_name) = split_log_path(&config.log_file)?;
    std::fs::create_dir_all(dir).map_err(|e| {
        RagwatchError::Config(format!("cannot create log directory {}: {e}", dir.display()))
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter(&config.log_level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(&config.log_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| RagwatchError::Internal(format!("tracing already initialized: {e}")))?;

    Ok(LoggingGuard { _file: file_guard })
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr)> {
    let file_name = path.file_name().ok_or_else(|| {
        RagwatchError::Config(format!("log_file {} has no file name", path.display()))
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, file_name))
}
