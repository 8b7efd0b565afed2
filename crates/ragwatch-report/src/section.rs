// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One report table per metric kind, with its summary line.

use ragwatch_core::{MetricKind, MetricsSource, Result, Status};

/// A rendered-ready table of stored rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: MetricKind,
    pub title: &'static str,
    pub labels: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Data rows in the backing file, shown or not.
    pub stored: usize,
    /// Mean of the latency column over the shown rows, three decimals.
    pub mean_latency: Option<String>,
    /// Failure rows among the shown rows, for kinds with a status column.
    pub failures: Option<usize>,
}

impl Section {
    /// Read up to `max_rows` rows of `kind` from `source`, oldest first.
    pub fn load(source: &dyn MetricsSource, kind: MetricKind, max_rows: usize) -> Result<Self> {
        let rows = source.read_rows(kind, max_rows)?;
        let stored = source.count_rows(kind)?;
        Ok(Self::from_rows(kind, rows, stored))
    }

    pub fn from_rows(kind: MetricKind, rows: Vec<Vec<String>>, stored: usize) -> Self {
        let mean_latency = kind.latency_column().and_then(|col| {
            let latencies: Vec<f64> = rows
                .iter()
                .filter_map(|row| row.get(col)?.parse::<f64>().ok())
                .collect();
            if latencies.is_empty() {
                None
            } else {
                let mean = latencies.iter().sum::<f64>() / latencies.len() as f64;
                Some(format!("{mean:.3}"))
            }
        });

        let failure: &str = Status::Failure.into();
        let failures = kind.status_column().map(|col| {
            rows.iter()
                .filter(|row| row.get(col).map(String::as_str) == Some(failure))
                .count()
        });

        Self {
            kind,
            title: kind.title(),
            labels: kind.column_labels().to_vec(),
            rows,
            stored,
            mean_latency,
            failures,
        }
    }

    pub fn shown(&self) -> usize {
        self.rows.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.stored > self.rows.len()
    }
}
