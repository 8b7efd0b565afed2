// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime side of Ragwatch.
//!
//! [`MetricsService`] is the entry point: it builds the configured backend,
//! hands out instrumentation wrappers ([`LlmMonitor`], [`StageMonitor`],
//! [`QueryMonitor`]), runs the background [`ResourceSampler`], and writes
//! the HTML report.

pub mod classify;
pub mod fanout;
pub mod instrument;
pub mod probe;
pub mod sampler;
pub mod service;
pub mod shutdown;

#[cfg(test)]
mod testing;

pub use classify::error_class;
pub use fanout::FanoutBackend;
pub use instrument::{
    LlmMonitor, Outcome, QueryMonitor, StageMonitor, time_and_record, time_and_record_async,
};
pub use probe::{ProbeError, ProcessProbe, ProcessUsage, SysinfoProbe};
pub use sampler::{APP_SERVICE, ResourceSampler, SamplerHandle};
pub use service::MetricsService;
pub use shutdown::install_signal_handler;
