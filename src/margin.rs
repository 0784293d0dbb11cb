use crate::location::Coordinate;

/// Posterior predictive distribution of the AQI at a single location
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub mean: f64,
    pub standard_deviation: f64,
}

impl Prediction {
    /// Standard deviation relative to the mean
    ///
    /// A mean of exactly zero leaves the ratio undefined. It is reported as positive infinity,
    /// the largest uncertainty there is, instead of letting the division produce a NaN.
    #[must_use]
    pub fn uncertainty_ratio(&self) -> f64 {
        if self.has_zero_mean() {
            f64::INFINITY
        } else {
            self.standard_deviation / self.mean
        }
    }

    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn has_zero_mean(&self) -> bool {
        self.mean == 0.
    }
}

/// Outcome of comparing one query against the threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The query coincides with an observation and is never flagged
    KnownLocation,
    /// The predicted mean is exactly zero; always flagged whatever the threshold
    ZeroMean,
    /// The uncertainty ratio is strictly below the threshold; flagged
    Uncertain,
    /// The uncertainty ratio is at or above the threshold; not flagged
    Confident,
}

impl Verdict {
    /// Classify a prediction at a location that is not already observed
    #[must_use]
    pub fn classify(prediction: &Prediction, threshold: f64) -> Self {
        if prediction.has_zero_mean() {
            Self::ZeroMean
        } else if prediction.uncertainty_ratio() < threshold {
            Self::Uncertain
        } else {
            Self::Confident
        }
    }

    #[must_use]
    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::ZeroMean | Self::Uncertain)
    }
}

/// A query location together with the model output that decided its verdict
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assessment {
    pub location: Coordinate,
    pub prediction: Prediction,
    pub verdict: Verdict,
}

impl Assessment {
    #[must_use]
    pub const fn is_flagged(&self) -> bool {
        self.verdict.is_flagged()
    }
}
