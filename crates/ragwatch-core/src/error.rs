// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ragwatch instrumentation layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::MetricKind;

/// The primary error type used across all Ragwatch crates.
#[derive(Debug, Error)]
pub enum RagwatchError {
    /// Configuration errors (invalid values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// A metric file could not be created, appended to, or read.
    #[error("storage error on {kind} metrics: {source}")]
    Storage {
        kind: MetricKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An observation violated a data-model constraint and was not written.
    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    /// The HTML report could not be rendered or written.
    #[error("failed to write report to {}: {source}", path.display())]
    Report {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Resource sampler lifecycle errors (spawned twice, task panicked).
    #[error("resource sampler error: {0}")]
    Sampler(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RagwatchError {
    /// Wrap an I/O or CSV failure on the file backing `kind`.
    pub fn storage(
        kind: MetricKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            kind,
            source: source.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RagwatchError>;
