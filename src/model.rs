//! Core data model.
//!
//! A work item is one water sample awaiting a (simulated) laboratory test.
//! It carries the five measured parameters, where it was drawn from, and the
//! result of having been processed by the engine.

pub mod band;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Work Item
// ---------------------------------------------------------------------------

/// A unit of work handed to the engine.
///
/// `processed` and `processing_duration` are only written by the engine's
/// test step (and cleared by [`WorkItem::reset`]), so
/// `processing_duration > 0` holds exactly when `processed` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItem {
    /// Unique within a batch, stable for the item's lifetime.
    id: SampleId,

    /// The five quality parameters measured for this sample.
    pub readings: Readings,

    /// Where the sample was drawn.
    pub source_location: String,

    processed: bool,

    /// Simulated test cost in seconds. Zero until processed.
    processing_duration: f64,
}

impl WorkItem {
    /// Create an unprocessed item. Ids start at 1.
    pub fn new(id: u32, readings: Readings, source_location: impl Into<String>) -> Result<Self> {
        if id == 0 {
            return Err(Error::InvalidArgument(
                "sample id must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            id: SampleId(id),
            readings,
            source_location: source_location.into(),
            processed: false,
            processing_duration: 0.0,
        })
    }

    pub fn id(&self) -> SampleId {
        self.id
    }

    pub fn processed(&self) -> bool {
        self.processed
    }

    pub fn processing_duration(&self) -> f64 {
        self.processing_duration
    }

    /// Quality rating derived from the readings.
    ///
    /// An item that has not been processed yet reports [`Quality::Moderate`].
    /// That value is a placeholder, not a measurement.
    pub fn rating(&self) -> Quality {
        if !self.processed {
            return Quality::Moderate;
        }
        self.readings.rate()
    }

    /// Display color for [`WorkItem::rating`].
    pub fn color(&self) -> Rgb {
        self.rating().color()
    }

    /// Clear the processing result so the item can be run again.
    pub fn reset(&mut self) {
        self.processed = false;
        self.processing_duration = 0.0;
    }

    /// Record a completed test. Only the engine calls this.
    pub(crate) fn mark_processed(&mut self, duration_secs: f64) {
        debug_assert!(!self.processed, "sample {} processed twice", self.id);
        debug_assert!(duration_secs > 0.0);
        self.processed = true;
        self.processing_duration = duration_secs;
    }
}

impl std::fmt::Display for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.processed { "tested" } else { "pending" };
        write!(
            f,
            "Sample {} [{status}] from {}: {}",
            self.id,
            self.source_location,
            self.rating()
        )
    }
}

/// Newtype for sample ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SampleId(pub u32);

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// The five measured water quality parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    /// pH, 0-14.
    pub ph: f64,
    /// Turbidity in NTU.
    pub turbidity: f64,
    /// Dissolved oxygen in mg/L.
    pub dissolved_oxygen: f64,
    /// Total coliform per 100ml.
    pub coliform: u32,
    /// Nitrate in mg/L.
    pub nitrate: f64,
}

const MAX_SCORE: f64 = 5.0;

impl Readings {
    /// Partial-credit score out of [`MAX_SCORE`].
    pub fn score(&self) -> f64 {
        let mut score = 0.0;

        if (6.5..=8.5).contains(&self.ph) {
            score += 1.0;
        } else if (6.0..=9.0).contains(&self.ph) {
            score += 0.5;
        }

        if self.turbidity < 5.0 {
            score += 1.0;
        } else if self.turbidity < 15.0 {
            score += 0.5;
        }

        if self.dissolved_oxygen >= 6.0 {
            score += 1.0;
        } else if self.dissolved_oxygen >= 4.0 {
            score += 0.5;
        }

        if self.coliform == 0 {
            score += 1.0;
        } else if self.coliform < 10 {
            score += 0.7;
        } else if self.coliform < 50 {
            score += 0.3;
        }

        if self.nitrate < 10.0 {
            score += 1.0;
        } else if self.nitrate < 20.0 {
            score += 0.5;
        }

        score
    }

    pub fn score_percent(&self) -> f64 {
        (self.score() / MAX_SCORE) * 100.0
    }

    /// Map the score onto the five-level scale. First threshold met wins.
    pub fn rate(&self) -> Quality {
        let pct = self.score_percent();
        if pct >= 90.0 {
            Quality::Excellent
        } else if pct >= 70.0 {
            Quality::Good
        } else if pct >= 50.0 {
            Quality::Moderate
        } else if pct >= 30.0 {
            Quality::Poor
        } else {
            Quality::Unsafe
        }
    }
}

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

/// Overall water quality, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Excellent,
    Good,
    Moderate,
    Poor,
    Unsafe,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Excellent,
        Quality::Good,
        Quality::Moderate,
        Quality::Poor,
        Quality::Unsafe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Quality::Excellent => "Excellent",
            Quality::Good => "Good",
            Quality::Moderate => "Moderate",
            Quality::Poor => "Poor",
            Quality::Unsafe => "Unsafe",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Quality::Excellent => Rgb(0, 200, 100),
            Quality::Good => Rgb(100, 220, 100),
            Quality::Moderate => Rgb(255, 200, 0),
            Quality::Poor => Rgb(255, 130, 0),
            Quality::Unsafe => Rgb(220, 50, 50),
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Count items per rating, in [`Quality::ALL`] order.
pub fn quality_distribution(items: &[WorkItem]) -> [(Quality, usize); 5] {
    Quality::ALL.map(|q| (q, items.iter().filter(|item| item.rating() == q).count()))
}
