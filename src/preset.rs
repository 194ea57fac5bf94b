//! Named sample sets for repeatable runs.
//!
//! Three sets are built in. More can be loaded from a TOML file:
//!
//! ```toml
//! [[preset.lakeside]]
//! ph = 7.2
//! turbidity = 1.5
//! do = 8.5
//! coliform = 0
//! nitrate = 2.0
//! location = "Mountain Spring"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Readings, WorkItem};

/// One sample in a preset set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetSample {
    pub ph: f64,
    pub turbidity: f64,
    #[serde(rename = "do")]
    pub dissolved_oxygen: f64,
    pub coliform: u32,
    pub nitrate: f64,
    pub location: String,
}

impl PresetSample {
    fn new(
        ph: f64,
        turbidity: f64,
        dissolved_oxygen: f64,
        coliform: u32,
        nitrate: f64,
        location: &str,
    ) -> Self {
        Self {
            ph,
            turbidity,
            dissolved_oxygen,
            coliform,
            nitrate,
            location: location.to_string(),
        }
    }

    pub fn readings(&self) -> Readings {
        Readings {
            ph: self.ph,
            turbidity: self.turbidity,
            dissolved_oxygen: self.dissolved_oxygen,
            coliform: self.coliform,
            nitrate: self.nitrate,
        }
    }
}

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct PresetFile {
    #[serde(default)]
    preset: BTreeMap<String, Vec<PresetSample>>,
}

/// Preset sets indexed by name.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: BTreeMap<String, Vec<PresetSample>>,
}

impl PresetCatalog {
    /// The built-in sets: `excellent_set`, `mixed_quality`, `contaminated_set`.
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(
            "excellent_set".to_string(),
            vec![
                PresetSample::new(7.2, 1.5, 8.5, 0, 2.0, "Mountain Spring"),
                PresetSample::new(7.4, 0.8, 9.0, 0, 1.5, "Natural Spring"),
                PresetSample::new(7.6, 1.2, 8.0, 0, 2.5, "Treatment Plant"),
            ],
        );
        presets.insert(
            "mixed_quality".to_string(),
            vec![
                PresetSample::new(7.2, 1.5, 8.5, 0, 2.0, "Mountain Spring"),
                PresetSample::new(6.8, 4.5, 6.5, 5, 7.0, "Urban Lake"),
                PresetSample::new(8.0, 12.0, 5.0, 25, 12.0, "Reservoir"),
                PresetSample::new(5.8, 35.0, 3.0, 150, 25.0, "Agricultural Runoff"),
                PresetSample::new(9.2, 80.0, 1.5, 500, 45.0, "Industrial Area"),
            ],
        );
        presets.insert(
            "contaminated_set".to_string(),
            vec![
                PresetSample::new(5.5, 45.0, 2.5, 180, 28.0, "Agricultural Runoff"),
                PresetSample::new(9.5, 95.0, 1.2, 450, 55.0, "Industrial Area"),
                PresetSample::new(6.0, 60.0, 2.0, 300, 35.0, "Urban Runoff"),
            ],
        );
        Self { presets }
    }

    /// Built-in sets plus those defined in `path`. File entries replace
    /// built-ins of the same name.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read preset file {}: {e}", path.display()))
        })?;
        let file: PresetFile = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("bad preset file {}: {e}", path.display())))?;

        let mut catalog = Self::builtin();
        for (name, samples) in file.preset {
            if samples.is_empty() {
                return Err(Error::Config(format!(
                    "preset {name} in {} has no samples",
                    path.display()
                )));
            }
            catalog.presets.insert(name, samples);
        }
        Ok(catalog)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&[PresetSample]> {
        self.presets.get(name).map(Vec::as_slice)
    }

    /// Build an unprocessed batch from a preset, ids `1..=len`.
    pub fn items(&self, name: &str) -> Result<Vec<WorkItem>> {
        let samples = self
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("preset {name}")))?;
        samples
            .iter()
            .zip(1u32..)
            .map(|(sample, id)| WorkItem::new(id, sample.readings(), sample.location.clone()))
            .collect()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
