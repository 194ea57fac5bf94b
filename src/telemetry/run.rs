//! Run execution span helpers.
//!
//! One span wraps each engine run; worker threads enter it so their
//! per-sample events nest under the run that dispatched them.

use tracing::Span;
use uuid::Uuid;

/// Start a span for one engine run.
///
/// `run.elapsed_s` is declared empty and filled in by
/// [`record_run_complete`].
pub fn start_run_span(mode: &str, run_id: &Uuid, items: usize, workers: usize) -> Span {
    tracing::info_span!(
        "run.execute",
        "run.mode" = mode,
        "run.id" = %run_id,
        "run.items" = items,
        "run.workers" = workers,
        "run.elapsed_s" = tracing::field::Empty,
    )
}

/// Record that a sample finished its test.
pub fn record_item_processed(span: &Span, sample_id: u32, worker: usize, duration_s: f64) {
    span.in_scope(|| {
        tracing::debug!(sample_id, worker, duration_s, "item_processed");
    });
}

/// Fill in the elapsed time and emit the completion event.
pub fn record_run_complete(span: &Span, elapsed_s: f64) {
    span.record("run.elapsed_s", elapsed_s);
    span.in_scope(|| {
        tracing::info!(elapsed_s, "run_complete");
    });
}
