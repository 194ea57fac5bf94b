//! Metric instrument factories for assay-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"assay-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for assay-rs instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("assay-rs")
}

/// Counter: samples that finished their test.
/// Labels: `mode` ("serial" | "concurrent").
pub fn items_processed() -> Counter<u64> {
    meter()
        .u64_counter("assay.items.processed")
        .with_description("Number of samples tested")
        .build()
}

/// Histogram: simulated test duration per sample, in milliseconds.
/// Labels: `mode`.
pub fn item_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("assay.item.duration_ms")
        .with_description("Simulated test duration per sample")
        .with_unit("ms")
        .build()
}

/// Counter: completed engine runs.
/// Labels: `mode`.
pub fn runs_completed() -> Counter<u64> {
    meter()
        .u64_counter("assay.runs.completed")
        .with_description("Number of completed engine runs")
        .build()
}

/// Histogram: wall-clock duration of a whole run, in milliseconds.
/// Labels: `mode`.
pub fn run_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("assay.run.duration_ms")
        .with_description("Wall-clock duration of an engine run")
        .with_unit("ms")
        .build()
}
