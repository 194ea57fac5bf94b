//! # assay-rs
//!
//! Batch scheduler for simulated water quality assays.
//!
//! Runs a batch of samples either one at a time or across a bounded pool of
//! worker threads, times each run, and compares the two to report speedup
//! and parallel efficiency. Also provides sample generation, preset sample
//! sets, and OpenTelemetry observability.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod model;
pub mod preset;
pub mod telemetry;
