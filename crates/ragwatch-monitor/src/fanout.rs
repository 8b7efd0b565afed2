// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A backend that forwards every observation to several backends in order.

use std::fmt;
use std::sync::Arc;

use ragwatch_core::{MetricsBackend, Result, Status};

/// Forwards each observation to every inner backend, in registration order.
///
/// Delivery stops at the first backend that fails and that failure is
/// returned. Put the durable store first so a later exporter cannot
/// prevent a row from being written.
pub struct FanoutBackend {
    backends: Vec<Arc<dyn MetricsBackend>>,
}

impl FanoutBackend {
    pub fn new(backends: Vec<Arc<dyn MetricsBackend>>) -> Self {
        Self { backends }
    }

    /// Append another backend after the existing ones.
    pub fn push(&mut self, backend: Arc<dyn MetricsBackend>) {
        self.backends.push(backend);
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    fn each(&self, mut f: impl FnMut(&dyn MetricsBackend) -> Result<()>) -> Result<()> {
        self.backends.iter().try_for_each(|b| f(b.as_ref()))
    }
}

impl fmt::Debug for FanoutBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.backends.iter().map(|b| b.name()))
            .finish()
    }
}

impl MetricsBackend for FanoutBackend {
    fn name(&self) -> &str {
        "fanout"
    }

    fn record_llm_latency(
        &self,
        model: &str,
        operation: &str,
        latency_seconds: f64,
        status: Status,
    ) -> Result<()> {
        self.each(|b| b.record_llm_latency(model, operation, latency_seconds, status))
    }

    fn record_rag_stage_latency(
        &self,
        stage: &str,
        latency_seconds: f64,
        status: Status,
        error_type: Option<&str>,
    ) -> Result<()> {
        self.each(|b| b.record_rag_stage_latency(stage, latency_seconds, status, error_type))
    }

    fn record_resource_usage(
        &self,
        service: &str,
        memory_bytes: u64,
        cpu_percent: f64,
    ) -> Result<()> {
        self.each(|b| b.record_resource_usage(service, memory_bytes, cpu_percent))
    }

    fn record_event(&self, event_type: &str, status: Status) -> Result<()> {
        self.each(|b| b.record_event(event_type, status))
    }

    fn record_query_processing(&self, query_type: &str, processing_seconds: f64) -> Result<()> {
        self.each(|b| b.record_query_processing(query_type, processing_seconds))
    }
}
