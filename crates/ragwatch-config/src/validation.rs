// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths and a CPU window that fits inside the tick interval.

use crate::diagnostic::ConfigError;
use crate::model::RagwatchConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RagwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.monitor.metrics_dir.as_os_str().is_empty() {
        fail("monitor.metrics_dir must not be empty".to_string());
    }

    if config.monitor.log_file.as_os_str().is_empty() {
        fail("monitor.log_file must not be empty".to_string());
    }

    let level = config.monitor.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "monitor.log_level `{}` is not one of {}",
            config.monitor.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let sampler = &config.sampler;
    if sampler.interval_secs == 0 {
        fail("sampler.interval_secs must be at least 1".to_string());
    }

    if sampler.cpu_window_ms == 0 {
        fail("sampler.cpu_window_ms must be at least 1".to_string());
    } else if sampler.interval_secs > 0
        && sampler.cpu_window_ms > sampler.interval_secs.saturating_mul(1000)
    {
        fail(format!(
            "sampler.cpu_window_ms ({}) must not exceed sampler.interval_secs ({}s)",
            sampler.cpu_window_ms, sampler.interval_secs
        ));
    }

    if sampler.track_sibling && sampler.sibling_process.trim().is_empty() {
        fail("sampler.sibling_process must not be empty when track_sibling is set".to_string());
    }

    if config.report.output_path.as_os_str().is_empty() {
        fail("report.output_path must not be empty".to_string());
    }

    if config.report.max_rows == 0 {
        fail("report.max_rows must be at least 1".to_string());
    }

    if let Some(path) = &config.prometheus.snapshot_path {
        if path.as_os_str().is_empty() {
            fail("prometheus.snapshot_path must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
