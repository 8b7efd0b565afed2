// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ragwatch instrumentation layer.
//!
//! This crate provides the metric data model, the capability traits that
//! backends implement, and the error type shared by every Ragwatch crate.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{RagwatchError, Result};
pub use traits::{MetricsBackend, MetricsSource};
pub use types::{
    CustomEvent, LlmLatencyRecord, MetricKind, MetricRecord, QueryRecord, ResourceSample,
    StageLatencyRecord, Status,
};
