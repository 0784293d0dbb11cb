use serde::{Deserialize, Serialize};

/// A point on the map, used as the only regression feature
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// The feature vector seen by the kernel, ordered (latitude, longitude)
    #[must_use]
    pub const fn as_feature(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }

    /// Whether `other` refers to the same place under the given matching rule
    #[must_use]
    pub fn matches(&self, other: &Self, rule: CoordinateMatch) -> bool {
        match rule {
            #[allow(clippy::float_cmp)]
            CoordinateMatch::Exact => {
                self.latitude == other.latitude && self.longitude == other.longitude
            }
            CoordinateMatch::Within(tolerance) => {
                (self.latitude - other.latitude).abs() <= tolerance
                    && (self.longitude - other.longitude).abs() <= tolerance
            }
        }
    }
}

/// How a query is compared with observed locations when deciding it is already measured.
///
/// `Exact` compares both components with floating point equality. Any rounding introduced when
/// coordinates are transformed or re-serialised breaks the match, in which case `Within` can be
/// used to accept a small absolute difference per component.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CoordinateMatch {
    #[default]
    Exact,
    Within(f64),
}

/// A single AQI reading at a known location
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub location: Coordinate,
    pub aqi: f64,
}

impl Observation {
    #[must_use]
    pub const fn new(location: Coordinate, aqi: f64) -> Self {
        Self { location, aqi }
    }
}
