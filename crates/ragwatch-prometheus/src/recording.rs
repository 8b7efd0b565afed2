// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade, so these record into whichever recorder is
//! current: the backend's local recorder, or a global one if installed.

use metrics::{describe_counter, describe_gauge, describe_histogram};

/// Register all Ragwatch metric descriptions.
///
/// Called once per recorder, before anything is recorded.
pub fn register_metrics() {
    describe_histogram!(
        "llm_response_time_seconds",
        "Time spent processing LLM responses"
    );
    describe_counter!("llm_requests_total", "Total number of LLM requests");
    describe_histogram!(
        "rag_stage_time_seconds",
        "Time spent in each RAG pipeline stage"
    );
    describe_counter!(
        "rag_stage_failures_total",
        "Total number of RAG pipeline stage failures"
    );
    describe_counter!(
        "rag_stage_success_total",
        "Total number of successful RAG pipeline stage executions"
    );
    describe_gauge!("memory_usage_bytes", "Memory usage in bytes");
    describe_gauge!("cpu_usage_percent", "CPU usage percentage");
    describe_counter!("custom_events_total", "Count of custom application events");
    describe_histogram!("query_processing_seconds", "Time spent processing queries");
}

/// Record one LLM call: a request count by outcome and a latency observation.
pub fn record_llm(model: &str, operation: &str, seconds: f64, status: &'static str) {
    metrics::counter!(
        "llm_requests_total",
        "model" => model.to_string(),
        "operation" => operation.to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "llm_response_time_seconds",
        "model" => model.to_string(),
        "operation" => operation.to_string()
    )
    .record(seconds);
}

/// Record a successful RAG stage.
pub fn record_stage_success(stage: &str, seconds: f64) {
    metrics::counter!("rag_stage_success_total", "stage" => stage.to_string()).increment(1);
    metrics::histogram!("rag_stage_time_seconds", "stage" => stage.to_string()).record(seconds);
}

/// Record a failed RAG stage, labelled with the failure's classification.
pub fn record_stage_failure(stage: &str, error_type: &str, seconds: f64) {
    metrics::counter!(
        "rag_stage_failures_total",
        "stage" => stage.to_string(),
        "error_type" => error_type.to_string()
    )
    .increment(1);
    metrics::histogram!("rag_stage_time_seconds", "stage" => stage.to_string()).record(seconds);
}

/// Set the latest memory and CPU readings for a service.
pub fn set_resource_usage(service: &str, memory_bytes: u64, cpu_percent: f64) {
    metrics::gauge!("memory_usage_bytes", "service" => service.to_string())
        .set(memory_bytes as f64);
    metrics::gauge!("cpu_usage_percent", "service" => service.to_string()).set(cpu_percent);
}

/// Count a custom event.
pub fn record_event(event_type: &str, status: &'static str) {
    metrics::counter!(
        "custom_events_total",
        "event_type" => event_type.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record query processing time.
pub fn record_query(query_type: &str, seconds: f64) {
    metrics::histogram!("query_processing_seconds", "query_type" => query_type.to_string())
        .record(seconds);
}
