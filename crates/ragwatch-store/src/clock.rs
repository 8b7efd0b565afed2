// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-kind non-decreasing wall-clock timestamps.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};
use ragwatch_core::MetricKind;

/// Timestamp format written to every metric file (local time, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Issues timestamps that never go backwards within one metric kind, even
/// if the system clock is stepped back between two writes.
#[derive(Debug, Default)]
pub struct TimestampClock {
    last: Mutex<HashMap<MetricKind, NaiveDateTime>>,
}

impl TimestampClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatted timestamp for the next record of `kind`.
    pub fn stamp(&self, kind: MetricKind) -> String {
        self.stamp_at(kind, Local::now().naive_local())
    }

    fn stamp_at(&self, kind: MetricKind, now: NaiveDateTime) -> String {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let ts = match last.get(&kind) {
            Some(prev) if *prev > now => *prev,
            _ => now,
        };
        last.insert(kind, ts);
        ts.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_micro_opt(h, m, s, 250)
            .unwrap()
    }

    #[test]
    fn formats_with_microseconds() {
        let clock = TimestampClock::new();
        assert_eq!(
            clock.stamp_at(MetricKind::LlmLatency, at(9, 30, 0)),
            "2026-10-17T09:30:00.000250"
        );
    }

    #[test]
    fn clock_step_back_is_clamped() {
        let clock = TimestampClock::new();
        let first = clock.stamp_at(MetricKind::LlmLatency, at(10, 0, 0));
        let second = clock.stamp_at(MetricKind::LlmLatency, at(9, 0, 0));
        assert_eq!(first, second);
        let third = clock.stamp_at(MetricKind::LlmLatency, at(10, 0, 1));
        assert!(third > second);
    }

    #[test]
    fn kinds_are_clamped_independently() {
        let clock = TimestampClock::new();
        clock.stamp_at(MetricKind::LlmLatency, at(10, 0, 0));
        let other = clock.stamp_at(MetricKind::CustomEvents, at(9, 0, 0));
        assert_eq!(other, "2026-10-17T09:00:00.000250");
    }
}
