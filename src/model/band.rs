//! Severity bands and synthetic sample generation.
//!
//! Each generated sample picks one band at random, then draws all five
//! parameters independently from that band's closed ranges.

use rand::Rng;

use super::{Readings, WorkItem};
use crate::error::{Error, Result};

/// Catalog of sampling locations.
pub const LOCATIONS: [&str; 15] = [
    "River Delta",
    "Mountain Spring",
    "Urban Lake",
    "Coastal Bay",
    "Underground Well",
    "Reservoir",
    "Treatment Plant",
    "Agricultural Runoff",
    "Industrial Area",
    "Rainwater Collection",
    "Desalination Plant",
    "Natural Spring",
    "Municipal Supply",
    "Irrigation Canal",
    "Wetland Area",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Excellent,
    Good,
    Moderate,
    Poor,
    Unsafe,
}

/// Closed `(low, high)` range per parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRanges {
    pub ph: (f64, f64),
    pub turbidity: (f64, f64),
    pub dissolved_oxygen: (f64, f64),
    pub coliform: (u32, u32),
    pub nitrate: (f64, f64),
}

impl Band {
    pub const ALL: [Band; 5] = [
        Band::Excellent,
        Band::Good,
        Band::Moderate,
        Band::Poor,
        Band::Unsafe,
    ];

    pub fn ranges(self) -> BandRanges {
        match self {
            Band::Excellent => BandRanges {
                ph: (7.0, 8.0),
                turbidity: (0.5, 2.0),
                dissolved_oxygen: (7.0, 10.0),
                coliform: (0, 1),
                nitrate: (0.5, 3.0),
            },
            Band::Good => BandRanges {
                ph: (6.5, 8.5),
                turbidity: (2.0, 5.0),
                dissolved_oxygen: (6.0, 8.0),
                coliform: (0, 10),
                nitrate: (3.0, 8.0),
            },
            Band::Moderate => BandRanges {
                ph: (6.0, 9.0),
                turbidity: (5.0, 15.0),
                dissolved_oxygen: (4.0, 6.0),
                coliform: (10, 50),
                nitrate: (8.0, 15.0),
            },
            Band::Poor => BandRanges {
                ph: (5.5, 9.5),
                turbidity: (15.0, 50.0),
                dissolved_oxygen: (2.0, 4.0),
                coliform: (50, 200),
                nitrate: (15.0, 30.0),
            },
            Band::Unsafe => BandRanges {
                ph: (4.0, 11.0),
                turbidity: (50.0, 200.0),
                dissolved_oxygen: (0.5, 2.0),
                coliform: (200, 1000),
                nitrate: (30.0, 100.0),
            },
        }
    }

    /// Draw readings within this band.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Readings {
        let r = self.ranges();
        Readings {
            ph: round2(rng.random_range(r.ph.0..=r.ph.1)),
            turbidity: round2(rng.random_range(r.turbidity.0..=r.turbidity.1)),
            dissolved_oxygen: round2(rng.random_range(r.dissolved_oxygen.0..=r.dissolved_oxygen.1)),
            coliform: rng.random_range(r.coliform.0..=r.coliform.1),
            nitrate: round2(rng.random_range(r.nitrate.0..=r.nitrate.1)),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl WorkItem {
    /// Generate a random sample: random band, random location.
    pub fn generate<R: Rng + ?Sized>(id: u32, rng: &mut R) -> Result<Self> {
        let readings = Band::random(rng).sample(rng);
        let location = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
        WorkItem::new(id, readings, location)
    }
}

/// Generate `count` samples with ids `1..=count` using the thread RNG.
pub fn generate_batch(count: usize) -> Result<Vec<WorkItem>> {
    generate_batch_with(count, &mut rand::rng())
}

pub fn generate_batch_with<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<WorkItem>> {
    if count == 0 {
        return Err(Error::InvalidArgument(
            "sample count must be at least 1".to_string(),
        ));
    }
    let count = u32::try_from(count)
        .map_err(|_| Error::InvalidArgument(format!("sample count {count} is too large")))?;
    (1..=count).map(|id| WorkItem::generate(id, rng)).collect()
}
