// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric kinds and the immutable observation records written for each.
//!
//! Every record type serializes with its fields in the same order as the
//! header of the file it is stored in, so a record can be appended as one
//! CSV row and deserialized back from one.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Outcome of an instrumented operation or custom event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// Status for a `Result` outcome.
    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// The five kinds of metric this layer records, one store file each.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    LlmLatency,
    RagStageLatency,
    ResourceUsage,
    CustomEvents,
    QueryProcessing,
}

impl MetricKind {
    /// All kinds, in report section order.
    pub const REPORT_ORDER: [MetricKind; 5] = [
        MetricKind::LlmLatency,
        MetricKind::RagStageLatency,
        MetricKind::CustomEvents,
        MetricKind::QueryProcessing,
        MetricKind::ResourceUsage,
    ];

    /// File name of this kind's store file inside the metrics directory.
    pub fn file_name(self) -> &'static str {
        match self {
            MetricKind::LlmLatency => "llm_latency.csv",
            MetricKind::RagStageLatency => "rag_stage_latency.csv",
            MetricKind::ResourceUsage => "resource_usage.csv",
            MetricKind::CustomEvents => "custom_events.csv",
            MetricKind::QueryProcessing => "query_processing.csv",
        }
    }

    /// Canonical header row, in column order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            MetricKind::LlmLatency => &[
                "timestamp",
                "model",
                "operation",
                "latency_seconds",
                "status",
            ],
            MetricKind::RagStageLatency => &["timestamp", "stage", "latency_seconds", "status"],
            MetricKind::ResourceUsage => &["timestamp", "service", "memory_bytes", "cpu_percent"],
            MetricKind::CustomEvents => &["timestamp", "event_type", "status"],
            MetricKind::QueryProcessing => {
                &["timestamp", "query_type", "processing_time_seconds"]
            }
        }
    }

    /// Human-readable column labels used by the report.
    pub fn column_labels(self) -> &'static [&'static str] {
        match self {
            MetricKind::LlmLatency => &["Timestamp", "Model", "Operation", "Latency (s)", "Status"],
            MetricKind::RagStageLatency => &["Timestamp", "Stage", "Latency (s)", "Status"],
            MetricKind::ResourceUsage => &["Timestamp", "Service", "Memory (bytes)", "CPU (%)"],
            MetricKind::CustomEvents => &["Timestamp", "Event Type", "Status"],
            MetricKind::QueryProcessing => &["Timestamp", "Query Type", "Processing Time (s)"],
        }
    }

    /// Section title used by the report.
    pub fn title(self) -> &'static str {
        match self {
            MetricKind::LlmLatency => "LLM Response Latency",
            MetricKind::RagStageLatency => "RAG Pipeline Stage Latency",
            MetricKind::ResourceUsage => "Resource Usage",
            MetricKind::CustomEvents => "Custom Events",
            MetricKind::QueryProcessing => "Query Processing Time",
        }
    }

    /// Index of the latency column, for kinds that measure a duration.
    pub fn latency_column(self) -> Option<usize> {
        match self {
            MetricKind::LlmLatency => Some(3),
            MetricKind::RagStageLatency => Some(2),
            MetricKind::QueryProcessing => Some(2),
            MetricKind::ResourceUsage | MetricKind::CustomEvents => None,
        }
    }

    /// Index of the status column, for kinds that carry one.
    pub fn status_column(self) -> Option<usize> {
        match self {
            MetricKind::LlmLatency => Some(4),
            MetricKind::RagStageLatency => Some(3),
            MetricKind::CustomEvents => Some(2),
            MetricKind::ResourceUsage | MetricKind::QueryProcessing => None,
        }
    }
}

/// One instrumented LLM call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmLatencyRecord {
    pub timestamp: String,
    pub model: String,
    pub operation: String,
    pub latency_seconds: f64,
    pub status: Status,
}

/// One instrumented RAG pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLatencyRecord {
    pub timestamp: String,
    pub stage: String,
    pub latency_seconds: f64,
    pub status: Status,
}

/// One sampler observation of a tracked service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub timestamp: String,
    pub service: String,
    pub memory_bytes: u64,
    pub cpu_percent: f64,
}

/// One explicit application-level event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub timestamp: String,
    pub event_type: String,
    pub status: Status,
}

/// One instrumented query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub timestamp: String,
    pub query_type: String,
    pub processing_time_seconds: f64,
}

/// Ties a record type to the metric kind whose file stores it.
pub trait MetricRecord: Serialize {
    const KIND: MetricKind;

    /// The record's timestamp.
    fn timestamp(&self) -> &str;
}

impl MetricRecord for LlmLatencyRecord {
    const KIND: MetricKind = MetricKind::LlmLatency;

    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl MetricRecord for StageLatencyRecord {
    const KIND: MetricKind = MetricKind::RagStageLatency;

    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl MetricRecord for ResourceSample {
    const KIND: MetricKind = MetricKind::ResourceUsage;

    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl MetricRecord for CustomEvent {
    const KIND: MetricKind = MetricKind::CustomEvents;

    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl MetricRecord for QueryRecord {
    const KIND: MetricKind = MetricKind::QueryProcessing;

    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Check that a duration in seconds can be recorded.
pub fn validate_seconds(field: &str, seconds: f64) -> crate::Result<()> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(())
    } else {
        Err(crate::RagwatchError::InvalidObservation(format!(
            "{field} must be a finite non-negative number of seconds, got {seconds}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn status_renders_lowercase() {
        assert_eq!(Status::Success.to_string(), "success");
        assert_eq!(Status::Failure.to_string(), "failure");
        assert_eq!(Status::from_str("failure").unwrap(), Status::Failure);
        assert!(Status::from_str("partial").is_err());
    }

    #[test]
    fn status_of_result() {
        let ok: Result<u8, ()> = Ok(1);
        let err: Result<u8, ()> = Err(());
        assert_eq!(Status::of(&ok), Status::Success);
        assert_eq!(Status::of(&err), Status::Failure);
    }

    #[test]
    fn every_kind_has_matching_labels_and_columns() {
        for kind in MetricKind::iter() {
            assert_eq!(kind.columns().len(), kind.column_labels().len(), "{kind}");
            assert_eq!(kind.columns()[0], "timestamp");
            assert!(kind.file_name().starts_with(&kind.to_string()));
        }
    }

    #[test]
    fn report_order_covers_every_kind_once() {
        let mut seen: Vec<MetricKind> = MetricKind::REPORT_ORDER.to_vec();
        seen.sort_by_key(|k| k.to_string());
        seen.dedup();
        assert_eq!(seen.len(), MetricKind::iter().count());
        assert_eq!(MetricKind::REPORT_ORDER[0], MetricKind::LlmLatency);
    }

    #[test]
    fn latency_and_status_columns_point_at_named_fields() {
        for kind in MetricKind::iter() {
            if let Some(i) = kind.latency_column() {
                assert!(kind.columns()[i].ends_with("_seconds"));
            }
            if let Some(i) = kind.status_column() {
                assert_eq!(kind.columns()[i], "status");
            }
        }
    }

    #[test]
    fn record_serializes_status_lowercase() {
        let record = CustomEvent {
            timestamp: "2026-01-01T00:00:00.000000".into(),
            event_type: "pdf_processed".into(),
            status: Status::Success,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "success");
    }

    #[test]
    fn negative_or_nan_seconds_rejected() {
        assert!(validate_seconds("latency", 0.0).is_ok());
        assert!(validate_seconds("latency", 0.42).is_ok());
        assert!(validate_seconds("latency", -0.1).is_err());
        assert!(validate_seconds("latency", f64::NAN).is_err());
        assert!(validate_seconds("latency", f64::INFINITY).is_err());
    }

    proptest::proptest! {
        #[test]
        fn any_non_negative_finite_seconds_accepted(s in 0.0f64..1.0e9) {
            proptest::prop_assert!(validate_seconds("latency", s).is_ok());
        }
    }
}
