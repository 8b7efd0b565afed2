// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static HTML report over stored metrics.
//!
//! The report is a single self-contained file: one table per metric kind,
//! oldest rows first, at most `max_rows` data rows per table. Kinds with no
//! stored file render as empty tables.

pub mod section;

use std::path::{Path, PathBuf};

use askama::Template;
use ragwatch_config::model::ReportConfig;
use ragwatch_core::{MetricKind, MetricsSource, RagwatchError, Result};
use tracing::info;

pub use section::Section;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    generated_at: String,
    max_rows: usize,
    sections: Vec<Section>,
}

/// Renders stored metrics to an HTML file.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    title: String,
    output_path: PathBuf,
    max_rows: usize,
}

impl ReportGenerator {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            output_path: config.output_path.clone(),
            max_rows: config.max_rows,
        }
    }

    /// Write to `path` instead of the configured output path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Load every section, in report order.
    pub fn sections(&self, source: &dyn MetricsSource) -> Result<Vec<Section>> {
        MetricKind::REPORT_ORDER
            .iter()
            .map(|kind| Section::load(source, *kind, self.max_rows))
            .collect()
    }

    /// Render the report to a string without touching the output path.
    pub fn render(&self, source: &dyn MetricsSource) -> Result<String> {
        let template = ReportTemplate {
            title: &self.title,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            max_rows: self.max_rows,
            sections: self.sections(source)?,
        };
        template.render().map_err(|e| self.report_error(e))
    }

    /// Render and write the report, replacing any previous one.
    pub fn generate(&self, source: &dyn MetricsSource) -> Result<PathBuf> {
        let html = self.render(source)?;
        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.report_error(e))?;
        }
        std::fs::write(&self.output_path, html).map_err(|e| self.report_error(e))?;
        info!(path = %self.output_path.display(), "report generated");
        Ok(self.output_path.clone())
    }

    fn report_error(
        &self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> RagwatchError {
        RagwatchError::Report {
            path: self.output_path.clone(),
            source: source.into(),
        }
    }
}
