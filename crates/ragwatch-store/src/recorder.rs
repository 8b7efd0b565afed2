// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recorders that timestamp an observation, append it to the CSV store,
//! and emit one structured log line per record.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ragwatch_core::types::validate_seconds;
use ragwatch_core::{
    CustomEvent, LlmLatencyRecord, MetricRecord, MetricsBackend, QueryRecord, ResourceSample,
    Result, StageLatencyRecord, Status,
};
use tracing::{debug, info};

use crate::clock::TimestampClock;
use crate::store::CsvStore;

/// [`MetricsBackend`] that persists every observation to a [`CsvStore`].
///
/// Writes at most one row per call. A failed write is returned as an error
/// and nothing is logged for it. Stamping and appending happen under one
/// lock, so rows from concurrent callers land in timestamp order.
#[derive(Debug)]
pub struct CsvRecorder {
    store: Arc<CsvStore>,
    clock: TimestampClock,
    order: Mutex<()>,
}

impl CsvRecorder {
    pub fn new(store: Arc<CsvStore>) -> Self {
        Self {
            store,
            clock: TimestampClock::new(),
            order: Mutex::new(()),
        }
    }

    /// The underlying store, for reading back what was recorded.
    pub fn store(&self) -> &Arc<CsvStore> {
        &self.store
    }

    fn ordered(&self) -> MutexGuard<'_, ()> {
        self.order.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<R: MetricRecord>(&self, record: &R) -> Result<()> {
        self.store.ensure_initialized(R::KIND)?;
        self.store.append(record)
    }
}

impl MetricsBackend for CsvRecorder {
    fn name(&self) -> &str {
        "csv"
    }

    fn record_llm_latency(
        &self,
        model: &str,
        operation: &str,
        latency_seconds: f64,
        status: Status,
    ) -> Result<()> {
        validate_seconds("latency_seconds", latency_seconds)?;
        let _order = self.ordered();
        let record = LlmLatencyRecord {
            timestamp: self.clock.stamp(LlmLatencyRecord::KIND),
            model: model.to_string(),
            operation: operation.to_string(),
            latency_seconds,
            status,
        };
        self.write(&record)?;

        info!(
            model,
            operation,
            latency_seconds,
            status = %status,
            "llm latency recorded"
        );
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
        let _order = self.ordered();
        let record = StageLatencyRecord {
            timestamp: self.clock.stamp(StageLatencyRecord::KIND),
            stage: stage.to_string(),
            latency_seconds,
            status,
        };
        self.write(&record)?;

        match error_type {
            Some(error_type) => info!(
                stage,
                latency_seconds,
                status = %status,
                error_type,
                "rag stage latency recorded"
            ),
            None => info!(stage, latency_seconds, status = %status, "rag stage latency recorded"),
        }
        Ok(())
    }

    fn record_resource_usage(
        &self,
        service: &str,
        memory_bytes: u64,
        cpu_percent: f64,
    ) -> Result<()> {
        let _order = self.ordered();
        let record = ResourceSample {
            timestamp: self.clock.stamp(ResourceSample::KIND),
            service: service.to_string(),
            memory_bytes,
            cpu_percent,
        };
        self.write(&record)?;

        // debug: the sampler writes this every few seconds
        debug!(
            service,
            memory_mb = memory_bytes as f64 / (1024.0 * 1024.0),
            cpu_percent,
            "resource usage recorded"
        );
        Ok(())
    }

    fn record_event(&self, event_type: &str, status: Status) -> Result<()> {
        let _order = self.ordered();
        let record = CustomEvent {
            timestamp: self.clock.stamp(CustomEvent::KIND),
            event_type: event_type.to_string(),
            status,
        };
        self.write(&record)?;

        info!(event_type, status = %status, "custom event recorded");
        Ok(())
    }

    fn record_query_processing(&self, query_type: &str, processing_seconds: f64) -> Result<()> {
        validate_seconds("processing_time_seconds", processing_seconds)?;
        let _order = self.ordered();
        let record = QueryRecord {
            timestamp: self.clock.stamp(QueryRecord::KIND),
            query_type: query_type.to_string(),
            processing_time_seconds: processing_seconds,
        };
        self.write(&record)?;

        info!(query_type, processing_seconds, "query processing recorded");
        Ok(())
    }
}
