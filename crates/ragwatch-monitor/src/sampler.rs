// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background resource sampler.
//!
//! Every tick the sampler measures the host process, then each sibling
//! process matching the configured name, and records one `resource_usage`
//! observation per process. Sibling rows carry the sibling name as their
//! `service` label. A failure to inspect processes only skips the affected
//! samples; a failure to record ends the task.

use std::sync::Arc;
use std::time::Duration;

use ragwatch_config::model::SamplerConfig;
use ragwatch_core::{MetricsBackend, RagwatchError, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::probe::{ProcessProbe, SysinfoProbe};

/// Service label used for the host process.
pub const APP_SERVICE: &str = "app";

/// Periodically samples process resources into a [`MetricsBackend`].
pub struct ResourceSampler<P = SysinfoProbe> {
    backend: Arc<dyn MetricsBackend>,
    probe: P,
    interval: Duration,
    cpu_window: Duration,
    sibling: Option<String>,
}

impl ResourceSampler<SysinfoProbe> {
    /// Sampler over the real process table.
    pub fn from_config(backend: Arc<dyn MetricsBackend>, config: &SamplerConfig) -> Result<Self> {
        let probe = SysinfoProbe::new().map_err(|e| RagwatchError::Sampler(e.to_string()))?;
        Ok(Self::new(backend, probe, config))
    }
}

impl<P: ProcessProbe> ResourceSampler<P> {
    pub fn new(backend: Arc<dyn MetricsBackend>, probe: P, config: &SamplerConfig) -> Self {
        Self {
            backend,
            probe,
            interval: config.interval(),
            cpu_window: config.cpu_window(),
            sibling: config.sibling().map(str::to_owned),
        }
    }

    /// Take one sample of every tracked process.
    ///
    /// Returns how many observations were recorded.
    pub async fn tick(&mut self) -> Result<usize> {
        if let Err(e) = self.probe.refresh() {
            debug!(error = %e, "process refresh failed before cpu window");
        }
        tokio::time::sleep(self.cpu_window).await;

        let mut recorded = 0;
        match self.probe.refresh().and_then(|()| self.probe.own_usage()) {
            Ok(usage) => {
                self.backend
                    .record_resource_usage(APP_SERVICE, usage.memory_bytes, usage.cpu_percent)?;
                recorded += 1;
            }
            Err(e) => debug!(error = %e, "skipping host process sample"),
        }

        if let Some(label) = &self.sibling {
            match self.probe.matching(label) {
                Ok(siblings) => {
                    for usage in siblings {
                        self.backend.record_resource_usage(
                            label,
                            usage.memory_bytes,
                            usage.cpu_percent,
                        )?;
                        recorded += 1;
                    }
                }
                Err(e) => trace!(sibling = %label, error = %e, "sibling scan failed"),
            }
        }

        Ok(recorded)
    }

    /// Sample until `cancel` fires or recording fails.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            sibling = self.sibling.as_deref().unwrap_or("-"),
            "resource sampler started"
        );
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                recorded = self.tick() => {
                    let recorded = recorded?;
                    trace!(recorded, "resource sample taken");
                }
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
        info!("resource sampler stopped");
        Ok(())
    }

    /// Run the sampler on the current tokio runtime.
    ///
    /// The task stops when `cancel` fires, when
    /// [`SamplerHandle::shutdown`] is called, or when recording fails.
    pub fn spawn(self, cancel: CancellationToken) -> SamplerHandle {
        let stopped = CancellationToken::new();
        let guard = stopped.clone().drop_guard();
        let task_cancel = cancel.clone();
        let join = tokio::spawn(async move {
            let _stopped = guard;
            let result = self.run(task_cancel).await;
            if let Err(e) = &result {
                error!(error = %e, "resource sampler terminated");
            }
            result
        });
        SamplerHandle {
            cancel,
            stopped,
            join,
        }
    }
}

/// Control handle for a spawned [`ResourceSampler`].
pub struct SamplerHandle {
    cancel: CancellationToken,
    stopped: CancellationToken,
    join: JoinHandle<Result<()>>,
}

impl SamplerHandle {
    pub fn is_running(&self) -> bool {
        !self.stopped.is_cancelled()
    }

    /// Ask the sampler to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token cancelled once the sampler task has exited for any reason.
    pub fn stopped_token(&self) -> CancellationToken {
        self.stopped.clone()
    }

    /// Resolves once the sampler task has exited for any reason.
    pub async fn stopped(&self) {
        self.stopped.cancelled().await;
    }

    /// Stop the sampler and wait for it, returning how it ended.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(RagwatchError::Sampler(format!("sampler task failed: {e}"))),
        }
    }
}
