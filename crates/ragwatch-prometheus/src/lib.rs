// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory Prometheus metrics backend for Ragwatch.
//!
//! Counters, gauges, and histograms live in a process-local Prometheus
//! recorder owned by the backend, so several backends (or tests) can exist
//! at once without fighting over the global recorder slot. Metrics are
//! rendered as Prometheus text format via [`PrometheusBackend::render`].

pub mod recording;

use std::path::Path;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use ragwatch_core::types::validate_seconds;
use ragwatch_core::{MetricsBackend, RagwatchError, Result, Status};

/// Prometheus-style metrics backend.
pub struct PrometheusBackend {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusBackend {
    /// Create a backend with its own recorder and register metric descriptions.
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, recording::register_metrics);
        tracing::info!("prometheus metrics backend ready");
        Self { recorder, handle }
    }

    /// Get a reference to the Prometheus handle for rendering.
    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Write the current text exposition to `path`, replacing any previous file.
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| RagwatchError::Report {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
        }
        std::fs::write(path, self.render()).map_err(|e| RagwatchError::Report {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        tracing::info!(path = %path.display(), "prometheus snapshot written");
        Ok(())
    }

    fn with_recorder<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.recorder, f)
    }
}

impl Default for PrometheusBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsBackend for PrometheusBackend {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn record_llm_latency(
        &self,
        model: &str,
        operation: &str,
        latency_seconds: f64,
        status: Status,
    ) -> Result<()> {
        validate_seconds("latency_seconds", latency_seconds)?;
        self.with_recorder(|| {
            recording::record_llm(model, operation, latency_seconds, status.into())
        });
        Ok(())
    }

    fn record_rag_stage_latency(
        &self,
        stage: &str,
        latency_seconds: f64,
        status: Status,
        error_type: Option<&str>,
    ) -> Result<()> {
        validate_seconds("latency_seconds", latency_seconds)?;
        self.with_recorder(|| match status {
            Status::Success => recording::record_stage_success(stage, latency_seconds),
            Status::Failure => recording::record_stage_failure(
                stage,
                error_type.unwrap_or("unknown"),
                latency_seconds,
            ),
        });
        Ok(())
    }

    fn record_resource_usage(
        &self,
        service: &str,
        memory_bytes: u64,
        cpu_percent: f64,
    ) -> Result<()> {
        self.with_recorder(|| recording::set_resource_usage(service, memory_bytes, cpu_percent));
        Ok(())
    }

    fn record_event(&self, event_type: &str, status: Status) -> Result<()> {
        self.with_recorder(|| recording::record_event(event_type, status.into()));
        Ok(())
    }

    fn record_query_processing(&self, query_type: &str, processing_seconds: f64) -> Result<()> {
        validate_seconds("processing_time_seconds", processing_seconds)?;
        self.with_recorder(|| recording::record_query(query_type, processing_seconds));
        Ok(())
    }
}
