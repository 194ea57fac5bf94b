//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast on malformed values. Every variable
//! is optional.

use crate::engine::{DurationRange, Engine, SimulatedAssay};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Pool size for concurrent runs. `None` means host parallelism.
    pub workers: Option<usize>,
    pub min_test_duration: f64,
    pub max_test_duration: f64,
    /// Largest batch the CLI will build.
    pub max_samples: usize,
    pub default_samples: usize,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: None,
            min_test_duration: DurationRange::DEFAULT_MIN,
            max_test_duration: DurationRange::DEFAULT_MAX,
            max_samples: 30,
            default_samples: 6,
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            workers: optional_var("ASSAY_WORKERS")?,
            min_test_duration: optional_var("ASSAY_MIN_DURATION")?
                .unwrap_or(defaults.min_test_duration),
            max_test_duration: optional_var("ASSAY_MAX_DURATION")?
                .unwrap_or(defaults.max_test_duration),
            max_samples: optional_var("ASSAY_MAX_SAMPLES")?.unwrap_or(defaults.max_samples),
            default_samples: optional_var("ASSAY_DEFAULT_SAMPLES")?
                .unwrap_or(defaults.default_samples),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(Error::Config("ASSAY_WORKERS must be at least 1".to_string()));
        }
        if self.max_samples == 0 {
            return Err(Error::Config("ASSAY_MAX_SAMPLES must be at least 1".to_string()));
        }
        if self.default_samples == 0 || self.default_samples > self.max_samples {
            return Err(Error::Config(format!(
                "ASSAY_DEFAULT_SAMPLES must be between 1 and {}",
                self.max_samples
            )));
        }
        self.duration_range()
            .map_err(|e| Error::Config(format!("test duration: {e}")))?;
        Ok(())
    }

    pub fn duration_range(&self) -> Result<DurationRange> {
        DurationRange::new(self.min_test_duration, self.max_test_duration)
    }

    /// Check a batch size against `max_samples`.
    ///
    /// Applies to generated batches and preset batches alike.
    pub fn check_batch_size(&self, n: usize) -> Result<usize> {
        if n == 0 || n > self.max_samples {
            return Err(Error::InvalidArgument(format!(
                "sample count must be between 1 and {}, got {n}",
                self.max_samples
            )));
        }
        Ok(n)
    }

    /// Build an engine from this configuration.
    pub fn engine(&self) -> Result<Engine> {
        Engine::with_assay(self.workers, SimulatedAssay::new(self.duration_range()?))
    }
}

fn optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("environment variable {name}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}
