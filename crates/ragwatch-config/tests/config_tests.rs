// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ragwatch configuration system.

use std::path::PathBuf;

use ragwatch_config::diagnostic::ConfigError;
use ragwatch_config::model::RagwatchConfig;
use ragwatch_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[monitor]
metrics_dir = "/var/lib/rag/metrics"
log_file = "/var/log/rag/monitoring.log"
log_level = "debug"

[sampler]
enabled = false
interval_secs = 10
cpu_window_ms = 250
track_sibling = true
sibling_process = "vllm"

[report]
output_path = "out/report.html"
title = "Nightly"
max_rows = 50

[prometheus]
enabled = true
snapshot_path = "out/metrics.prom"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.monitor.metrics_dir, PathBuf::from("/var/lib/rag/metrics"));
    assert_eq!(config.monitor.log_level, "debug");
    assert!(!config.sampler.enabled);
    assert_eq!(config.sampler.interval_secs, 10);
    assert_eq!(config.sampler.cpu_window().as_millis(), 250);
    assert_eq!(config.sampler.sibling(), Some("vllm"));
    assert_eq!(config.report.output_path, PathBuf::from("out/report.html"));
    assert_eq!(config.report.max_rows, 50);
    assert!(config.prometheus.enabled);
    assert_eq!(
        config.prometheus.snapshot_path,
        Some(PathBuf::from("out/metrics.prom"))
    );
}

/// An empty document yields the documented defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.monitor.metrics_dir, PathBuf::from("metrics"));
    assert_eq!(config.monitor.log_file, PathBuf::from("monitoring.log"));
    assert_eq!(config.sampler.interval().as_secs(), 5);
    assert_eq!(config.sampler.cpu_window().as_millis(), 100);
    assert_eq!(config.sampler.sibling(), Some("ollama"));
    assert_eq!(
        config.report.output_path,
        PathBuf::from("monitoring_report.html")
    );
    assert_eq!(config.report.max_rows, 100);
    assert!(!config.prometheus.enabled);
}

/// Partial sections keep defaults for the keys they omit.
#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[sampler]\ninterval_secs = 2\n").unwrap();
    assert_eq!(config.sampler.interval_secs, 2);
    assert_eq!(config.sampler.cpu_window_ms, 100);
    assert!(config.sampler.enabled);
}

/// Unknown keys are rejected with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let errors = load_and_validate_str("[sampler]\ninterval_sec = 3\n")
        .expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "interval_secs"
    )));
}

/// Unknown top-level sections are rejected too.
#[test]
fn unknown_section_rejected() {
    assert!(load_config_from_str("[alerts]\nenabled = true\n").is_err());
}

/// A wrong value type becomes an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type() {
    let errors = load_and_validate_str("[report]\nmax_rows = \"many\"\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

/// Semantic validation runs after a successful parse.
#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str("[report]\nmax_rows = 0\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("max_rows"))));
}

/// An explicit config path is loaded and validated.
#[test]
fn explicit_path_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragwatch.toml");
    std::fs::write(&path, "[report]\ntitle = \"From file\"\n").unwrap();
    let config = load_and_validate_path(&path).expect("file config is valid");
    assert_eq!(config.report.title, "From file");
}

/// A missing explicit config path is an error, not silently defaulted.
#[test]
fn missing_explicit_path_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let errors = load_and_validate_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(&errors[0], ConfigError::Other(m) if m.contains("does not exist")));
}

/// The effective config serializes back to TOML.
#[test]
fn config_round_trips_through_toml() {
    let config = RagwatchConfig::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let back = load_config_from_str(&text).unwrap();
    assert_eq!(back.sampler.sibling_process, "ollama");
    assert_eq!(back.report.max_rows, 100);
}
