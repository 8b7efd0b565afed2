// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-back capability used by the report generator.

use crate::error::Result;
use crate::types::MetricKind;

/// Read access to previously recorded rows.
pub trait MetricsSource: Send + Sync {
    /// Returns up to `limit` data rows of `kind` in stored (oldest-first)
    /// order, header excluded. A kind with no stored data yields an empty
    /// vector, not an error.
    fn read_rows(&self, kind: MetricKind, limit: usize) -> Result<Vec<Vec<String>>>;

    /// Total number of data rows stored for `kind`.
    fn count_rows(&self, kind: MetricKind) -> Result<usize>;
}
