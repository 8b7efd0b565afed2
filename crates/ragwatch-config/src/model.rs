// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Ragwatch.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Ragwatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RagwatchConfig {
    /// Metrics directory and logging settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Background resource sampler settings.
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// HTML report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// In-memory Prometheus backend settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// Where metrics and logs are written.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Directory holding one CSV file per metric kind. Created on demand.
    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: PathBuf,

    /// Append-only text log, echoed to the console.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            metrics_dir: default_metrics_dir(),
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

fn default_metrics_dir() -> PathBuf {
    PathBuf::from("metrics")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("monitoring.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resource sampler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerConfig {
    /// Whether `ragwatch run` starts the sampler.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds slept between ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// CPU measurement window per tick, in milliseconds.
    #[serde(default = "default_cpu_window_ms")]
    pub cpu_window_ms: u64,

    /// Whether to look for a sibling process each tick.
    #[serde(default = "default_true")]
    pub track_sibling: bool,

    /// Case-insensitive substring matched against process names and
    /// command-line arguments. Also used as the recorded service name.
    #[serde(default = "default_sibling_process")]
    pub sibling_process: String,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            cpu_window_ms: default_cpu_window_ms(),
            track_sibling: true,
            sibling_process: default_sibling_process(),
        }
    }
}

impl SamplerConfig {
    /// Sleep between ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// CPU measurement window.
    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }

    /// The sibling label to track, if sibling tracking is on.
    pub fn sibling(&self) -> Option<&str> {
        if self.track_sibling {
            Some(self.sibling_process.as_str())
        } else {
            None
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    5
}

fn default_cpu_window_ms() -> u64 {
    100
}

fn default_sibling_process() -> String {
    "ollama".to_string()
}

/// HTML report configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Output file, overwritten on each generation.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Maximum data rows rendered per table.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            title: default_title(),
            max_rows: default_max_rows(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("monitoring_report.html")
}

fn default_title() -> String {
    "RAG Monitoring Report".to_string()
}

fn default_max_rows() -> usize {
    100
}

/// Prometheus backend configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Record into an in-memory Prometheus registry alongside the CSV store.
    #[serde(default)]
    pub enabled: bool,

    /// Where `ragwatch run` writes the text exposition on shutdown.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}
