//! Run history: one record per completed engine run.
//!
//! Records are appended when a run finishes and never changed afterwards.
//! The comparison summary is derived from the newest serial and concurrent
//! records.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Mode, efficiency, speedup};

/// Outcome of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub mode: Mode,
    pub item_count: usize,
    /// Only set for concurrent runs.
    pub worker_count: Option<usize>,
    pub total_seconds: f64,
    pub avg_seconds_per_item: f64,
}

impl RunRecord {
    pub(crate) fn new(
        run_id: Uuid,
        mode: Mode,
        item_count: usize,
        worker_count: Option<usize>,
        total_seconds: f64,
    ) -> Self {
        let avg_seconds_per_item = if item_count == 0 {
            0.0
        } else {
            total_seconds / item_count as f64
        };
        Self {
            run_id,
            recorded_at: Utc::now(),
            mode,
            item_count,
            worker_count,
            total_seconds,
            avg_seconds_per_item,
        }
    }
}

/// Append-only log of runs. Appends are serialized by a mutex.
#[derive(Debug, Default)]
pub struct RunHistory {
    records: Mutex<Vec<RunRecord>>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&self, record: RunRecord) {
        self.lock().push(record);
    }

    /// Snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<RunRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Compare the newest serial run against the newest concurrent run.
    ///
    /// Returns `None` until at least one run of each mode has completed.
    pub fn summary(&self) -> Option<Summary> {
        let records = self.lock();
        let mut serial = None;
        let mut concurrent = None;

        for record in records.iter().rev() {
            match record.mode {
                Mode::Serial if serial.is_none() => serial = Some(record),
                Mode::Concurrent if concurrent.is_none() => concurrent = Some(record),
                _ => {}
            }
            if serial.is_some() && concurrent.is_some() {
                break;
            }
        }

        let (serial, concurrent) = (serial?, concurrent?);
        let worker_count = concurrent.worker_count.unwrap_or(1);
        let ratio = speedup(serial.total_seconds, concurrent.total_seconds);
        let time_saved = serial.total_seconds - concurrent.total_seconds;

        Some(Summary {
            sequential_time: serial.total_seconds,
            parallel_time: concurrent.total_seconds,
            speedup: ratio,
            efficiency_pct: efficiency(ratio, worker_count),
            worker_count,
            sample_count: concurrent.item_count,
            time_saved_seconds: time_saved,
            time_saved_pct: if serial.total_seconds > 0.0 {
                time_saved / serial.total_seconds * 100.0
            } else {
                0.0
            },
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RunRecord>> {
        // Records are only pushed whole, so a poisoned lock still holds a
        // consistent vector.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Serial vs. concurrent comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub sequential_time: f64,
    pub parallel_time: f64,
    pub speedup: f64,
    pub efficiency_pct: f64,
    pub worker_count: usize,
    pub sample_count: usize,
    pub time_saved_seconds: f64,
    pub time_saved_pct: f64,
}
