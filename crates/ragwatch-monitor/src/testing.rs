// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory backends for unit tests.

use std::sync::Mutex;

use ragwatch_core::{MetricKind, MetricsBackend, RagwatchError, Result, Status};

/// Records every observation as a formatted line.
#[derive(Default)]
pub(crate) struct MemoryBackend {
    entries: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    fn push(&self, line: String) -> Result<()> {
        self.entries.lock().unwrap().push(line);
        Ok(())
    }
}

impl MetricsBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn record_llm_latency(
        &self,
        model: &str,
        operation: &str,
        secs: f64,
        status: Status,
    ) -> Result<()> {
        self.push(format!("llm,{model},{operation},{secs},{status}"))
    }

    fn record_rag_stage_latency(
        &self,
        stage: &str,
        secs: f64,
        status: Status,
        error_type: Option<&str>,
    ) -> Result<()> {
        self.push(format!("stage,{stage},{secs},{status},{}", error_type.unwrap_or("-")))
    }

    fn record_resource_usage(&self, service: &str, memory_bytes: u64, cpu: f64) -> Result<()> {
        self.push(format!("resource,{service},{memory_bytes},{cpu}"))
    }

    fn record_event(&self, event_type: &str, status: Status) -> Result<()> {
        self.push(format!("event,{event_type},{status}"))
    }

    fn record_query_processing(&self, query_type: &str, secs: f64) -> Result<()> {
        self.push(format!("query,{query_type},{secs}"))
    }
}

/// Fails every observation with a storage error.
pub(crate) struct FailingBackend;

fn unwritable(kind: MetricKind) -> Result<()> {
    Err(RagwatchError::storage(kind, std::io::Error::other("read-only file system")))
}

impl MetricsBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn record_llm_latency(&self, _: &str, _: &str, _: f64, _: Status) -> Result<()> {
        unwritable(MetricKind::LlmLatency)
    }

    fn record_rag_stage_latency(&self, _: &str, _: f64, _: Status, _: Option<&str>) -> Result<()> {
        unwritable(MetricKind::RagStageLatency)
    }

    fn record_resource_usage(&self, _: &str, _: u64, _: f64) -> Result<()> {
        unwritable(MetricKind::ResourceUsage)
    }

    fn record_event(&self, _: &str, _: Status) -> Result<()> {
        unwritable(MetricKind::CustomEvents)
    }

    fn record_query_processing(&self, _: &str, _: f64) -> Result<()> {
        unwritable(MetricKind::QueryProcessing)
    }
}
