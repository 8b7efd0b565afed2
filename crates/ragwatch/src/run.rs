// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ragwatch run`: sample until told to stop, then write the report.

use ragwatch_core::Result;
use ragwatch_monitor::MetricsService;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the monitor until `stop` is cancelled or the sampler dies.
///
/// The report (and Prometheus snapshot, when configured) is written on the
/// way out either way. A store failure that killed the sampler is returned
/// after the report is written.
pub async fn run_until(service: &MetricsService, stop: CancellationToken) -> Result<()> {
    if service.config().sampler.enabled {
        service.start_sampler()?;
    }
    info!("monitoring system started");

    tokio::select! {
        _ = stop.cancelled() => {}
        _ = service.sampler_stopped() => warn!("resource sampler exited, stopping monitor"),
    }

    let sampler_result = service.shutdown().await;
    let report = service.generate_report()?;
    info!(path = %report.display(), "monitoring report written");
    if let Some(path) = service.write_prometheus_snapshot()? {
        info!(path = %path.display(), "prometheus snapshot written");
    }
    sampler_result
}
