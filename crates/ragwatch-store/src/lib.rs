// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only CSV persistence for Ragwatch metrics.
//!
//! [`CsvStore`] owns the metrics directory: one self-initializing file per
//! [`MetricKind`](ragwatch_core::MetricKind), appended to and never rewritten.
//! [`CsvRecorder`] is the [`MetricsBackend`](ragwatch_core::MetricsBackend)
//! that timestamps observations and writes them through the store.

pub mod clock;
pub mod recorder;
pub mod store;

pub use clock::TimestampClock;
pub use recorder::CsvRecorder;
pub use store::CsvStore;
