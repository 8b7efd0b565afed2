// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The metrics service: one configured backend, its wrappers, the sampler
//! lifecycle, and report generation behind a single handle.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use ragwatch_config::model::RagwatchConfig;
use ragwatch_core::{MetricsBackend, RagwatchError, Result, Status};
use ragwatch_prometheus::PrometheusBackend;
use ragwatch_report::ReportGenerator;
use ragwatch_store::{CsvRecorder, CsvStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::fanout::FanoutBackend;
use crate::instrument::{LlmMonitor, QueryMonitor, StageMonitor};
use crate::probe::ProcessProbe;
use crate::sampler::{ResourceSampler, SamplerHandle};

/// Owns the metrics backend and everything built on it.
///
/// Create one per process and pass it (or clones of the monitors it hands
/// out) to the code being instrumented.
pub struct MetricsService {
    config: RagwatchConfig,
    store: Arc<CsvStore>,
    backend: Arc<dyn MetricsBackend>,
    prometheus: Option<Arc<PrometheusBackend>>,
    sampler: Mutex<Option<SamplerHandle>>,
}

impl MetricsService {
    /// Build the CSV store (plus the Prometheus registry when enabled) and
    /// create every metrics file with its header.
    pub fn new(config: RagwatchConfig) -> Result<Self> {
        let store = Arc::new(CsvStore::new(&config.monitor.metrics_dir));
        let csv: Arc<dyn MetricsBackend> = Arc::new(CsvRecorder::new(store.clone()));

        let (backend, prometheus) = if config.prometheus.enabled {
            let prometheus = Arc::new(PrometheusBackend::new());
            let exporter: Arc<dyn MetricsBackend> = prometheus.clone();
            let fanout = FanoutBackend::new(vec![csv, exporter]);
            (Arc::new(fanout) as Arc<dyn MetricsBackend>, Some(prometheus))
        } else {
            (csv, None)
        };

        Self::assemble(config, store, backend, prometheus)
    }

    /// Use `backend` for recording; reports are still read from the CSV store
    /// under `monitor.metrics_dir`.
    pub fn with_backend(config: RagwatchConfig, backend: Arc<dyn MetricsBackend>) -> Result<Self> {
        let store = Arc::new(CsvStore::new(&config.monitor.metrics_dir));
        Self::assemble(config, store, backend, None)
    }

    fn assemble(
        config: RagwatchConfig,
        store: Arc<CsvStore>,
        backend: Arc<dyn MetricsBackend>,
        prometheus: Option<Arc<PrometheusBackend>>,
    ) -> Result<Self> {
        store.initialize_all()?;
        info!(
            metrics_dir = %store.dir().display(),
            backend = backend.name(),
            "metrics service ready"
        );
        Ok(Self {
            config,
            store,
            backend,
            prometheus,
            sampler: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RagwatchConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn MetricsBackend> {
        &self.backend
    }

    pub fn store(&self) -> &Arc<CsvStore> {
        &self.store
    }

    /// The Prometheus registry, when `prometheus.enabled` is set.
    pub fn prometheus(&self) -> Option<&Arc<PrometheusBackend>> {
        self.prometheus.as_ref()
    }

    pub fn llm(&self, model: impl Into<String>, operation: impl Into<String>) -> LlmMonitor {
        LlmMonitor::new(self.backend.clone(), model, operation)
    }

    pub fn rag_stage(&self, stage: impl Into<String>) -> StageMonitor {
        StageMonitor::new(self.backend.clone(), stage)
    }

    pub fn query(&self, query_type: impl Into<String>) -> QueryMonitor {
        QueryMonitor::new(self.backend.clone(), query_type)
    }

    pub fn record_event(&self, event_type: &str, status: Status) -> Result<()> {
        self.backend.record_event(event_type, status)
    }

    /// Start sampling the real process table.
    pub fn start_sampler(&self) -> Result<()> {
        let sampler = ResourceSampler::from_config(self.backend.clone(), &self.config.sampler)?;
        self.install_sampler(sampler)
    }

    /// Start sampling through a caller-supplied probe.
    pub fn start_sampler_with<P: ProcessProbe>(&self, probe: P) -> Result<()> {
        let sampler = ResourceSampler::new(self.backend.clone(), probe, &self.config.sampler);
        self.install_sampler(sampler)
    }

    fn install_sampler<P: ProcessProbe>(&self, sampler: ResourceSampler<P>) -> Result<()> {
        let mut slot = self.sampler_slot();
        if slot.as_ref().is_some_and(SamplerHandle::is_running) {
            return Err(RagwatchError::Sampler(
                "resource sampler is already running".to_string(),
            ));
        }
        *slot = Some(sampler.spawn(CancellationToken::new()));
        Ok(())
    }

    pub fn sampler_running(&self) -> bool {
        self.sampler_slot()
            .as_ref()
            .is_some_and(SamplerHandle::is_running)
    }

    /// Resolves when the sampler task exits. Never resolves if no sampler
    /// was started.
    pub async fn sampler_stopped(&self) {
        let token = self.sampler_slot().as_ref().map(SamplerHandle::stopped_token);
        match token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    /// Stop the sampler, if any, and wait for it to finish.
    ///
    /// Returns the error that ended the sampler early, if one did.
    pub async fn shutdown(&self) -> Result<()> {
        let handle = self.sampler_slot().take();
        let result = match handle {
            Some(handle) => handle.shutdown().await,
            None => Ok(()),
        };
        info!("metrics service stopped");
        result
    }

    /// Write the HTML report to `report.output_path`.
    pub fn generate_report(&self) -> Result<PathBuf> {
        ReportGenerator::new(&self.config.report).generate(self.store.as_ref())
    }

    /// Write the Prometheus text exposition to `prometheus.snapshot_path`.
    ///
    /// Returns `None` when Prometheus is disabled or no path is configured.
    pub fn write_prometheus_snapshot(&self) -> Result<Option<PathBuf>> {
        match (&self.prometheus, &self.config.prometheus.snapshot_path) {
            (Some(prometheus), Some(path)) => {
                prometheus.write_snapshot(path)?;
                Ok(Some(path.clone()))
            }
            _ => Ok(None),
        }
    }

    fn sampler_slot(&self) -> MutexGuard<'_, Option<SamplerHandle>> {
        self.sampler.lock().unwrap_or_else(|poisoned| {
            warn!("sampler lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Drop for MetricsService {
    fn drop(&mut self) {
        let slot = self
            .sampler
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.as_ref() {
            handle.cancel();
        }
    }
}
