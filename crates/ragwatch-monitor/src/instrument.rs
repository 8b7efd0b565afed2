// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instrumentation wrappers: time a unit of work, classify its outcome, and
//! record it exactly once.
//!
//! A monitor is created once with its static labels (model and operation,
//! stage name, or query type) and then wraps any number of calls:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use ragwatch_core::RagwatchError;
//! # use ragwatch_monitor::instrument::LlmMonitor;
//! # fn demo(backend: Arc<dyn ragwatch_core::MetricsBackend>) -> Result<(), RagwatchError> {
//! let generate = LlmMonitor::new(backend, "mistral", "generation");
//! let answer: String = generate.call(|| Ok::<_, RagwatchError>("42".to_string()))?;
//! # Ok(())
//! # }
//! ```
//!
//! The wrapped operation's value or error comes back unchanged. The only
//! thing a wrapper adds is a recorder failure: it is converted into the
//! caller's error type through `From<RagwatchError>` and returned instead,
//! even when the operation itself had already failed.
//!
//! A panic in the operation records one failure row and then keeps
//! unwinding. A future dropped before it resolves records nothing.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use ragwatch_core::{MetricsBackend, RagwatchError, Status};
use tracing::warn;

use crate::classify::error_class;

/// How a timed operation ended.
pub enum Outcome<'a, T, E> {
    Returned(&'a Result<T, E>),
    /// The operation panicked; the panic continues after recording.
    Panicked,
}

impl<T, E> Outcome<'_, T, E> {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Returned(result) => Status::of(*result),
            Outcome::Panicked => Status::Failure,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Returned(Err(e)) => Some(e),
            _ => None,
        }
    }
}

/// Holds the recorder while the operation runs, so a panic unwinding
/// through the wrapper still produces its one failure row.
struct Recording<T, E, R>
where
    R: FnOnce(f64, Outcome<'_, T, E>) -> ragwatch_core::Result<()>,
{
    start: Instant,
    record: Option<R>,
    _outcome: PhantomData<fn() -> (T, E)>,
}

impl<T, E, R> Recording<T, E, R>
where
    R: FnOnce(f64, Outcome<'_, T, E>) -> ragwatch_core::Result<()>,
{
    fn start(record: R) -> Self {
        Self {
            start: Instant::now(),
            record: Some(record),
            _outcome: PhantomData,
        }
    }

    fn finish(&mut self, result: &Result<T, E>) -> ragwatch_core::Result<()> {
        let secs = self.start.elapsed().as_secs_f64();
        match self.record.take() {
            Some(record) => record(secs, Outcome::Returned(result)),
            None => Ok(()),
        }
    }
}

impl<T, E, R> Drop for Recording<T, E, R>
where
    R: FnOnce(f64, Outcome<'_, T, E>) -> ragwatch_core::Result<()>,
{
    fn drop(&mut self) {
        // a future dropped before completion is not a failure
        if !std::thread::panicking() {
            return;
        }
        if let Some(record) = self.record.take() {
            if let Err(e) = record(self.start.elapsed().as_secs_f64(), Outcome::Panicked) {
                warn!(error = %e, "could not record panicked operation");
            }
        }
    }
}

/// Run `op`, then hand its elapsed seconds and outcome to `record`.
///
/// `record` runs exactly once, after `op` has fully returned or while its
/// panic unwinds. If it fails after a return, its error replaces the
/// operation's result; during a panic its error is only logged.
pub fn time_and_record<T, E, F, R>(op: F, record: R) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    R: FnOnce(f64, Outcome<'_, T, E>) -> ragwatch_core::Result<()>,
    E: From<RagwatchError>,
{
    let mut recording = Recording::start(record);
    let result = op();
    recording.finish(&result)?;
    result
}

/// Async form of [`time_and_record`]; the clock runs until `op` resolves.
///
/// Dropping the returned future before `op` resolves records nothing.
pub async fn time_and_record_async<T, E, Fut, R>(op: Fut, record: R) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    R: FnOnce(f64, Outcome<'_, T, E>) -> ragwatch_core::Result<()>,
    E: From<RagwatchError>,
{
    let mut recording = Recording::start(record);
    let result = op.await;
    recording.finish(&result)?;
    result
}

/// Wraps calls to an LLM backend, recording latency and success/failure.
#[derive(Clone)]
pub struct LlmMonitor {
    backend: Arc<dyn MetricsBackend>,
    model: String,
    operation: String,
}

impl LlmMonitor {
    pub fn new(
        backend: Arc<dyn MetricsBackend>,
        model: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            operation: operation.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Time `op` and record one `llm_latency` row for it.
    pub fn call<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RagwatchError>,
    {
        time_and_record(op, |secs, outcome| self.record(secs, outcome))
    }

    /// Async form of [`call`](Self::call).
    pub async fn call_async<T, E, Fut>(&self, op: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<RagwatchError>,
    {
        time_and_record_async(op, |secs, outcome| self.record(secs, outcome)).await
    }

    fn record<T, E>(&self, secs: f64, outcome: Outcome<'_, T, E>) -> ragwatch_core::Result<()> {
        self.backend
            .record_llm_latency(&self.model, &self.operation, secs, outcome.status())
    }
}

impl fmt::Debug for LlmMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmMonitor")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .field("operation", &self.operation)
            .finish()
    }
}

/// Wraps one named RAG pipeline stage.
///
/// Failures are recorded with the error's class (see
/// [`error_class`](crate::classify::error_class)) as auxiliary context.
#[derive(Clone)]
pub struct StageMonitor {
    backend: Arc<dyn MetricsBackend>,
    stage: String,
}

impl StageMonitor {
    pub fn new(backend: Arc<dyn MetricsBackend>, stage: impl Into<String>) -> Self {
        Self {
            backend,
            stage: stage.into(),
        }
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Time `op` and record one `rag_stage_latency` row for it.
    pub fn call<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RagwatchError> + fmt::Debug,
    {
        time_and_record(op, |secs, outcome| self.record(secs, outcome))
    }

    /// Async form of [`call`](Self::call).
    pub async fn call_async<T, E, Fut>(&self, op: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<RagwatchError> + fmt::Debug,
    {
        time_and_record_async(op, |secs, outcome| self.record(secs, outcome)).await
    }

    fn record<T, E: fmt::Debug>(
        &self,
        secs: f64,
        outcome: Outcome<'_, T, E>,
    ) -> ragwatch_core::Result<()> {
        let status = outcome.status();
        let error_type = match outcome {
            Outcome::Returned(_) => outcome.error().map(error_class),
            Outcome::Panicked => Some("panic".to_string()),
        };
        self.backend.record_rag_stage_latency(
            &self.stage,
            secs,
            status,
            error_type.as_deref(),
        )
    }
}

impl fmt::Debug for StageMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageMonitor")
            .field("backend", &self.backend.name())
            .field("stage", &self.stage)
            .finish()
    }
}

/// Wraps query processing.
///
/// The query schema has no status column, so one row is recorded per call
/// whatever the outcome; failures are additionally logged at `warn`.
#[derive(Clone)]
pub struct QueryMonitor {
    backend: Arc<dyn MetricsBackend>,
    query_type: String,
}

impl QueryMonitor {
    pub fn new(backend: Arc<dyn MetricsBackend>, query_type: impl Into<String>) -> Self {
        Self {
            backend,
            query_type: query_type.into(),
        }
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// Time `op` and record one `query_processing` row for it.
    pub fn call<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RagwatchError>,
    {
        time_and_record(op, |secs, outcome| self.record(secs, outcome))
    }

    /// Async form of [`call`](Self::call).
    pub async fn call_async<T, E, Fut>(&self, op: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<RagwatchError>,
    {
        time_and_record_async(op, |secs, outcome| self.record(secs, outcome)).await
    }

    fn record<T, E>(&self, secs: f64, outcome: Outcome<'_, T, E>) -> ragwatch_core::Result<()> {
        if outcome.status() == Status::Failure {
            warn!(
                query_type = %self.query_type,
                processing_seconds = secs,
                "query failed"
            );
        }
        self.backend.record_query_processing(&self.query_type, secs)
    }
}

impl fmt::Debug for QueryMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryMonitor")
            .field("backend", &self.backend.name())
            .field("query_type", &self.query_type)
            .finish()
    }
}
