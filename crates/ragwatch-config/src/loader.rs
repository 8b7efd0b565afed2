// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered loading of `ragwatch.toml`.
//!
//! Every loader starts from the compiled defaults, so a file only needs the
//! keys it changes: a bare `[sampler]\ninterval_secs = 30` is a complete
//! config. Files are searched in [`search_paths`] order and merged key by
//! key; `RAGWATCH_<SECTION>_<KEY>` variables are applied last, which is how
//! a deployment points `monitor.metrics_dir` at a volume without a file.

// figment::Error is large and external
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RagwatchConfig;

/// Config sections, in the order they appear in a generated file.
const SECTIONS: [&str; 4] = ["monitor", "sampler", "report", "prometheus"];

/// Candidate config files, lowest precedence first: system-wide, the
/// user's config directory, then `ragwatch.toml` in the working directory.
///
/// Paths are returned whether or not they exist; missing files are skipped
/// when merging.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/ragwatch/ragwatch.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("ragwatch").join("ragwatch.toml"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("ragwatch.toml"));
    }
    paths
}

/// Defaults, every file from [`search_paths`], then the environment.
pub fn load_config() -> Result<RagwatchConfig, figment::Error> {
    search_paths()
        .iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file_exact(path)))
        .merge(env_provider())
        .extract()
}

/// Defaults, the one file at `path`, then the environment. The search
/// paths are not consulted, so `ragwatch --config` is reproducible.
pub fn load_config_from_path(path: &Path) -> Result<RagwatchConfig, figment::Error> {
    defaults()
        .merge(Toml::file_exact(path))
        .merge(env_provider())
        .extract()
}

/// Defaults overlaid with `toml_content`; neither files nor environment.
pub fn load_config_from_str(toml_content: &str) -> Result<RagwatchConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(RagwatchConfig::default()))
}

/// `RAGWATCH_SAMPLER_INTERVAL_SECS` becomes `sampler.interval_secs`.
///
/// Keys contain underscores, so splitting on `_` would produce
/// `sampler.interval.secs`; only the section prefix is split off.
fn env_provider() -> Env {
    Env::prefixed("RAGWATCH_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("sampler_interval_secs"), "sampler.interval_secs");
        assert_eq!(map_env_key("monitor_metrics_dir"), "monitor.metrics_dir");
        assert_eq!(map_env_key("report_max_rows"), "report.max_rows");
        assert_eq!(map_env_key("prometheus_enabled"), "prometheus.enabled");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn search_paths_end_with_working_directory() {
        let paths = search_paths();
        assert_eq!(paths[0], PathBuf::from("/etc/ragwatch/ragwatch.toml"));
        let last = paths.last().unwrap();
        assert_eq!(last, &std::env::current_dir().unwrap().join("ragwatch.toml"));
    }

    #[test]
    fn partial_string_keeps_other_defaults() {
        let config = load_config_from_str("[sampler]\ninterval_secs = 30\n").unwrap();
        assert_eq!(config.sampler.interval_secs, 30);
        assert_eq!(config.sampler.sibling_process, "ollama");
        assert_eq!(config.report.max_rows, 100);
    }
}
