// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Ragwatch.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `RAGWATCH_*` environment variable overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use ragwatch_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("metrics in {}", config.monitor.metrics_dir.display());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str, search_paths};
pub use model::RagwatchConfig;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<RagwatchConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources())
}

/// Load configuration from one explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<RagwatchConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file {} does not exist",
            path.display()
        ))]);
    }
    let sources = read_sources([path.to_path_buf()]);
    finish(loader::load_config_from_path(path), sources)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<RagwatchConfig, Vec<ConfigError>> {
    let sources = vec![("<inline>".to_string(), toml_content.to_string())];
    finish(loader::load_config_from_str(toml_content), sources)
}

fn finish(
    loaded: Result<RagwatchConfig, figment::Error>,
    sources: Vec<(String, String)>,
) -> Result<RagwatchConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, &sources))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Contents of every config file in the lookup hierarchy that exists.
fn collect_toml_sources() -> Vec<(String, String)> {
    read_sources(loader::search_paths())
}

fn read_sources(
    paths: impl IntoIterator<Item = std::path::PathBuf>,
) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
