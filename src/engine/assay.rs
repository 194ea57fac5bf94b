//! The simulated per-sample test step.
//!
//! Each test draws a fresh duration, blocks the calling thread for that long
//! and marks the sample processed with that duration.

use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};
use crate::model::WorkItem;

/// Closed range of simulated test durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationRange {
    min: f64,
    max: f64,
}

impl DurationRange {
    pub const DEFAULT_MIN: f64 = 1.0;
    pub const DEFAULT_MAX: f64 = 3.0;

    /// Requires `0 < min <= max`, with `max` representable as a [`Duration`].
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max < min {
            return Err(Error::InvalidArgument(format!(
                "test duration range must satisfy 0 < min <= max, got [{min}, {max}]"
            )));
        }
        if max >= Duration::MAX.as_secs_f64() {
            return Err(Error::InvalidArgument(format!(
                "test duration {max}s is too large"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Draw a duration, rounded to the millisecond and kept inside the range.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let raw = rng.random_range(self.min..=self.max);
        ((raw * 1000.0).round() / 1000.0).clamp(self.min, self.max)
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Stand-in for a laboratory analysis: costs time, cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAssay {
    range: DurationRange,
}

impl SimulatedAssay {
    pub fn new(range: DurationRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> DurationRange {
        self.range
    }

    /// Run the test on one sample. Blocks the current thread only.
    pub fn test(&self, mut item: WorkItem) -> WorkItem {
        let secs = self.range.draw(&mut rand::rng());
        std::thread::sleep(Duration::from_secs_f64(secs));
        item.mark_processed(secs);
        item
    }
}
