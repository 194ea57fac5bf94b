//! The batch engine. Runs a batch of samples serially or across a bounded
//! pool of worker threads, times the run, and keeps the run history.
//!
//! The engine never keeps samples after a run: callers hand a batch in by
//! value and get the processed batch back.

pub mod assay;
mod pool;

pub use assay::{DurationRange, SimulatedAssay};

use std::collections::HashSet;
use std::time::Instant;

use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use tracing::{Span, debug};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::history::{RunHistory, RunRecord, Summary};
use crate::model::WorkItem;
use crate::telemetry::metrics;
use crate::telemetry::run::{record_item_processed, record_run_complete, start_run_span};

/// Execution strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One sample at a time, in input order.
    Serial,
    /// Up to `workers` samples at once.
    Concurrent,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Serial => "serial",
            Mode::Concurrent => "concurrent",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "serial" | "sequential" => Ok(Mode::Serial),
            "concurrent" | "parallel" => Ok(Mode::Concurrent),
            other => Err(Error::InvalidArgument(format!("unknown mode: {other}"))),
        }
    }
}

/// Processed samples and the wall-clock seconds the run took.
pub type RunOutput = (Vec<WorkItem>, f64);

/// Host parallelism, or 1 if it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// The batch engine.
pub struct Engine {
    workers: usize,
    thread_limit: Option<usize>,
    assay: SimulatedAssay,
    history: RunHistory,
}

impl Engine {
    /// Create an engine with the default 1-3 second test step.
    ///
    /// `workers` defaults to the host's available parallelism.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        Self::with_assay(workers, SimulatedAssay::default())
    }

    pub fn with_assay(workers: Option<usize>, assay: SimulatedAssay) -> Result<Self> {
        let workers = workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(Error::InvalidArgument(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            workers,
            thread_limit: None,
            assay,
            history: RunHistory::new(),
        })
    }

    /// Cap the threads a concurrent run may start, below `workers`.
    #[cfg(test)]
    pub(crate) fn with_thread_limit(mut self, limit: usize) -> Self {
        self.thread_limit = Some(limit);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn assay(&self) -> &SimulatedAssay {
        &self.assay
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Newest serial run compared with the newest concurrent run.
    pub fn summary(&self) -> Option<Summary> {
        self.history.summary()
    }

    pub fn run(&self, mode: Mode, items: Vec<WorkItem>) -> Result<RunOutput> {
        match mode {
            Mode::Serial => self.run_serial(items),
            Mode::Concurrent => self.run_concurrent(items),
        }
    }

    /// Test every sample one at a time, in input order.
    ///
    /// Returns the samples in the same order.
    pub fn run_serial(&self, items: Vec<WorkItem>) -> Result<RunOutput> {
        validate_batch(&items)?;

        let run_id = Uuid::new_v4();
        let count = items.len();
        let span = start_run_span(Mode::Serial.as_str(), &run_id, count, 1);
        let _enter = span.enter();

        let start = Instant::now();
        let processed: Vec<WorkItem> = items
            .into_iter()
            .map(|item| self.test_one(Mode::Serial, &span, 0, item))
            .collect();
        let elapsed = elapsed_secs(start, count);

        self.finish(run_id, Mode::Serial, count, None, elapsed, &span);
        Ok((processed, elapsed))
    }

    /// Test the samples on up to `workers` threads at once.
    ///
    /// The batch comes back in completion order; sort by id if input order
    /// matters. Fails with [`Error::ResourceExhausted`] if a worker thread
    /// cannot be started, in which case no run is recorded.
    pub fn run_concurrent(&self, items: Vec<WorkItem>) -> Result<RunOutput> {
        validate_batch(&items)?;

        let run_id = Uuid::new_v4();
        let count = items.len();
        let span = start_run_span(Mode::Concurrent.as_str(), &run_id, count, self.workers);
        let _enter = span.enter();

        let start = Instant::now();
        let processed = pool::run(
            items,
            self.workers,
            self.thread_limit,
            &span,
            |worker, item| self.test_one(Mode::Concurrent, &span, worker, item),
        )?;
        let elapsed = elapsed_secs(start, count);

        self.finish(
            run_id,
            Mode::Concurrent,
            count,
            Some(self.workers),
            elapsed,
            &span,
        );
        Ok((processed, elapsed))
    }

    fn test_one(&self, mode: Mode, span: &Span, worker: usize, item: WorkItem) -> WorkItem {
        let item = self.assay.test(item);
        let duration = item.processing_duration();
        record_item_processed(span, item.id().0, worker, duration);

        let labels = [KeyValue::new("mode", mode.as_str())];
        metrics::items_processed().add(1, &labels);
        metrics::item_duration_ms().record(duration * 1000.0, &labels);
        item
    }

    fn finish(
        &self,
        run_id: Uuid,
        mode: Mode,
        count: usize,
        workers: Option<usize>,
        elapsed: f64,
        span: &Span,
    ) {
        record_run_complete(span, elapsed);

        let labels = [KeyValue::new("mode", mode.as_str())];
        metrics::runs_completed().add(1, &labels);
        metrics::run_duration_ms().record(elapsed * 1000.0, &labels);

        self.history
            .append(RunRecord::new(run_id, mode, count, workers, elapsed));
    }
}

/// An empty batch reports exactly zero so [`speedup`] can detect it.
fn elapsed_secs(start: Instant, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        start.elapsed().as_secs_f64()
    }
}

/// Reject batches the engine cannot process exactly once per sample.
fn validate_batch(items: &[WorkItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.processed() {
            return Err(Error::InvalidArgument(format!(
                "sample {} was already processed; reset it before re-running",
                item.id()
            )));
        }
        if !seen.insert(item.id()) {
            return Err(Error::InvalidArgument(format!(
                "sample {} appears more than once in the batch",
                item.id()
            )));
        }
    }
    Ok(())
}

/// Serial time over concurrent time. Zero when concurrent time is zero.
pub fn speedup(serial_seconds: f64, concurrent_seconds: f64) -> f64 {
    if concurrent_seconds == 0.0 {
        return 0.0;
    }
    serial_seconds / concurrent_seconds
}

/// Speedup per worker, as a percentage.
///
/// Not clamped: timing jitter can push this slightly over 100.
pub fn efficiency(speedup: f64, worker_count: usize) -> f64 {
    if worker_count == 0 {
        return 0.0;
    }
    speedup / worker_count as f64 * 100.0
}

/// Reset every sample so the batch can be run again.
pub fn reset_batch(items: &mut [WorkItem]) {
    for item in items.iter_mut() {
        item.reset();
    }
    debug!(items = items.len(), "batch reset for re-run");
}
