use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::estimate::Estimator;
use crate::location::CoordinateMatch;
use crate::Result;

/// Confidence threshold used when a settings file does not name one
pub const DEFAULT_THRESHOLD: f64 = 1e-6;

/// Estimator settings as read from a `toml` file
///
/// ```toml
/// threshold = 0.05
/// match_tolerance = 1e-6
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_threshold", alias = "confidence_threshold")]
    pub threshold: f64,
    /// When present, queries within this distance (per component) of an observation count as
    /// observed. Exact matching is used otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_tolerance: Option<f64>,
}

const fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            match_tolerance: None,
        }
    }
}

impl Config {
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid `toml`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// # Errors
    /// Returns an error if `contents` is not valid `toml` for a [`Config`].
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Build a validated [`Estimator`] from these settings
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidParameter`] if the threshold or tolerance is out of range.
    pub fn estimator(&self) -> Result<Estimator> {
        let matching = self
            .match_tolerance
            .map_or(CoordinateMatch::Exact, CoordinateMatch::Within);
        Estimator::new(self.threshold)?.with_matching(matching)
    }
}
