//! JSON exchange format used by callers that shell out to the estimator.
//!
//! A request carries the measurements taken so far, the candidate locations and the threshold:
//!
//! ```json
//! {
//!   "measurements": [{"location": {"latitude": 0.0, "longitude": 0.0}, "aqi": 10.0}],
//!   "queries": [{"latitude": 0.5, "longitude": 0.5}],
//!   "threshold": 0.2,
//!   "time": 120
//! }
//! ```
//!
//! The response is the JSON array of flagged query locations.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::estimate::estimate;
use crate::location::{Coordinate, Observation};
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EstimateRequest {
    pub measurements: Vec<Observation>,
    pub queries: Vec<Coordinate>,
    /// Absent thresholds are reported by [`EstimateRequest::run`], not by the decoder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Simulation time at which the request was issued, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl EstimateRequest {
    /// # Errors
    /// Returns [`crate::Error::Json`] if `contents` is not a valid request.
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// # Errors
    /// Returns [`crate::Error::Json`] if the reader fails or yields an invalid request.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// # Errors
    /// Returns [`Error::InvalidParameter`] if the request has no threshold, otherwise see
    /// [`estimate`].
    pub fn run(&self) -> Result<Vec<Coordinate>> {
        let threshold = self
            .threshold
            .ok_or_else(|| Error::invalid("threshold", "missing from request"))?;
        estimate(&self.measurements, &self.queries, threshold)
    }
}

/// Serialise flagged locations as a JSON array of `{latitude, longitude}` objects
///
/// # Errors
/// Returns [`crate::Error::Json`] if serialisation fails.
pub fn to_json(uncertain: &[Coordinate]) -> Result<String> {
    Ok(serde_json::to_string(uncertain)?)
}
