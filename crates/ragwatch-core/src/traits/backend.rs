// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording capability shared by every metrics backend.

use crate::error::Result;
use crate::types::Status;

/// A sink for metric observations.
///
/// Instrumentation wrappers and the resource sampler depend only on this
/// trait, so the append-only CSV store and the in-memory Prometheus backend
/// can be swapped or combined. Every method records exactly one observation
/// and returns an error instead of dropping it.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Records the latency of one LLM call.
    fn record_llm_latency(
        &self,
        model: &str,
        operation: &str,
        latency_seconds: f64,
        status: Status,
    ) -> Result<()>;

    /// Records the latency of one RAG pipeline stage.
    ///
    /// `error_type` classifies the failure when `status` is
    /// [`Status::Failure`]; backends without a column for it may only log it.
    fn record_rag_stage_latency(
        &self,
        stage: &str,
        latency_seconds: f64,
        status: Status,
        error_type: Option<&str>,
    ) -> Result<()>;

    /// Records one memory/CPU sample for a tracked service.
    fn record_resource_usage(&self, service: &str, memory_bytes: u64, cpu_percent: f64)
    -> Result<()>;

    /// Records one custom application event.
    fn record_event(&self, event_type: &str, status: Status) -> Result<()>;

    /// Records the processing time of one query.
    fn record_query_processing(&self, query_type: &str, processing_seconds: f64) -> Result<()>;
}
