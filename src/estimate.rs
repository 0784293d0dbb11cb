use ndarray::Array1;
use tracing::debug;

use crate::kernel::Kernel;
use crate::location::{Coordinate, CoordinateMatch, Observation};
use crate::margin::{Assessment, Verdict};
use crate::math::feature_matrix;
use crate::regression::GaussianProcess;
use crate::{Error, Result};

/// Return the queries whose interpolated AQI is not yet trustworthy
///
/// Fits a Gaussian process with the default kernel to `observations` and keeps, in input order,
/// every query whose uncertainty ratio is strictly below `threshold`. Queries that coincide
/// exactly with an observation are never returned, and queries with a predicted mean of exactly
/// zero are always returned.
///
/// # Errors
/// - [`Error::InsufficientData`] if `observations` is empty
/// - [`Error::InvalidParameter`] if `threshold` is not positive and finite, or any coordinate or
///   AQI value is not finite
/// - [`Error::Linalg`] if the training covariance cannot be factorised
pub fn estimate(
    observations: &[Observation],
    queries: &[Coordinate],
    threshold: f64,
) -> Result<Vec<Coordinate>> {
    Estimator::new(threshold)?.uncertain(observations, queries)
}

/// Settings for a single uncertainty estimate
///
/// A fresh model is fit on every call, so one estimator can be reused across unrelated batches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimator {
    threshold: f64,
    matching: CoordinateMatch,
    kernel: Kernel,
}

impl Estimator {
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if `threshold` is not positive and finite.
    pub fn new(threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            matching: CoordinateMatch::Exact,
            kernel: Kernel::default(),
        })
    }

    /// Use `matching` when deciding whether a query is an observed location
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if a tolerance is negative or not finite.
    pub fn with_matching(mut self, matching: CoordinateMatch) -> Result<Self> {
        if let CoordinateMatch::Within(tolerance) = matching {
            if !(tolerance.is_finite() && tolerance >= 0.) {
                return Err(Error::invalid(
                    "match_tolerance",
                    format!("must be non-negative and finite, got {tolerance}"),
                ));
            }
        }
        self.matching = matching;
        Ok(self)
    }

    #[must_use]
    pub const fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub const fn matching(&self) -> CoordinateMatch {
        self.matching
    }

    /// Predict every query and record why it is, or is not, flagged
    ///
    /// The assessments follow the order of `queries`. Known locations still carry the model's
    /// prediction at that point.
    ///
    /// # Errors
    /// See [`estimate`].
    pub fn assess(
        &self,
        observations: &[Observation],
        queries: &[Coordinate],
    ) -> Result<Vec<Assessment>> {
        validate_observations(observations)?;
        validate_queries(queries)?;
        if queries.is_empty() {
            return Ok(vec![]);
        }

        let locations = observations
            .iter()
            .map(|observation| observation.location)
            .collect::<Vec<_>>();
        let targets = observations
            .iter()
            .map(|observation| observation.aqi)
            .collect::<Array1<f64>>();

        let gp = GaussianProcess::fit(self.kernel, feature_matrix(&locations)?, &targets)?;
        let predictions = gp.predict(&feature_matrix(queries)?)?;

        let assessments = queries
            .iter()
            .zip(predictions)
            .map(|(query, prediction)| {
                let verdict = if locations
                    .iter()
                    .any(|location| location.matches(query, self.matching))
                {
                    Verdict::KnownLocation
                } else {
                    Verdict::classify(&prediction, self.threshold)
                };
                Assessment {
                    location: *query,
                    prediction,
                    verdict,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            queries = assessments.len(),
            flagged = assessments.iter().filter(|a| a.is_flagged()).count(),
            threshold = self.threshold,
            "assessed query locations"
        );

        Ok(assessments)
    }

    /// The flagged subsequence of `queries`
    ///
    /// # Errors
    /// See [`estimate`].
    pub fn uncertain(
        &self,
        observations: &[Observation],
        queries: &[Coordinate],
    ) -> Result<Vec<Coordinate>> {
        Ok(self
            .assess(observations, queries)?
            .into_iter()
            .filter(Assessment::is_flagged)
            .map(|assessment| assessment.location)
            .collect())
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold > 0. {
        Ok(())
    } else {
        Err(Error::invalid(
            "threshold",
            format!("must be positive and finite, got {threshold}"),
        ))
    }
}

fn validate_observations(observations: &[Observation]) -> Result<()> {
    if observations.is_empty() {
        return Err(Error::InsufficientData(
            "at least one observation is required to fit the model".into(),
        ));
    }
    for (ii, observation) in observations.iter().enumerate() {
        if !observation.location.is_finite() {
            return Err(Error::invalid(
                format!("measurements[{ii}].location"),
                "latitude and longitude must be finite",
            ));
        }
        if !observation.aqi.is_finite() {
            return Err(Error::invalid(
                format!("measurements[{ii}].aqi"),
                format!("must be finite, got {}", observation.aqi),
            ));
        }
    }
    Ok(())
}

fn validate_queries(queries: &[Coordinate]) -> Result<()> {
    match queries.iter().position(|query| !query.is_finite()) {
        Some(ii) => Err(Error::invalid(
            format!("queries[{ii}]"),
            "latitude and longitude must be finite",
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::{estimate, Estimator};
    use crate::location::{Coordinate, CoordinateMatch, Observation};
    use crate::margin::Verdict;
    use crate::{Error, Result};

    fn two_readings() -> Vec<Observation> {
        vec![
            Observation::new(Coordinate::new(0., 0.), 10.),
            Observation::new(Coordinate::new(1., 1.), 20.),
        ]
    }

    #[test]
    fn thresholds_that_are_not_positive_and_finite_are_rejected() {
        for threshold in [0., -0.5, f64::NAN, f64::INFINITY] {
            let result = estimate(&two_readings(), &[Coordinate::new(0.5, 0.5)], threshold);
            assert!(matches!(
                result,
                Err(Error::InvalidParameter { field, .. }) if field == "threshold"
            ));
        }
    }

    #[test]
    fn empty_observations_are_insufficient() {
        let result = estimate(&[], &[Coordinate::new(0.5, 0.5)], 0.1);
        assert!(matches!(result, Err(Error::InsufficientData(_))));

        let result = estimate(&[], &[], 0.1);
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn non_finite_inputs_name_the_offending_field() {
        let mut observations = two_readings();
        observations[1].aqi = f64::NAN;
        let result = estimate(&observations, &[], 0.1);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { field, .. }) if field == "measurements[1].aqi"
        ));

        let queries = [Coordinate::new(0., 0.), Coordinate::new(f64::NAN, 0.)];
        let result = estimate(&two_readings(), &queries, 0.1);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { field, .. }) if field == "queries[1]"
        ));
    }

    #[test]
    fn assessments_follow_query_order() -> Result<()> {
        let queries = [
            Coordinate::new(5., 5.),
            Coordinate::new(0., 0.),
            Coordinate::new(0.5, 0.5),
        ];

        let assessments = Estimator::new(0.2)?.assess(&two_readings(), &queries)?;

        let locations = assessments.iter().map(|a| a.location).collect::<Vec<_>>();
        assert_eq!(locations, queries);
        assert_eq!(assessments[0].verdict, Verdict::Confident);
        assert_eq!(assessments[1].verdict, Verdict::KnownLocation);
        assert_eq!(assessments[2].verdict, Verdict::Uncertain);
        Ok(())
    }

    #[test]
    fn tolerant_matching_excludes_nearly_observed_queries() -> Result<()> {
        let queries = [Coordinate::new(1e-9, -1e-9)];

        let exact = Estimator::new(10.)?.uncertain(&two_readings(), &queries)?;
        let tolerant = Estimator::new(10.)?
            .with_matching(CoordinateMatch::Within(1e-6))?
            .uncertain(&two_readings(), &queries)?;

        assert_eq!(exact, queries);
        assert!(tolerant.is_empty());
        Ok(())
    }

    #[test]
    fn negative_tolerances_are_rejected() {
        let result =
            Estimator::new(0.1).and_then(|e| e.with_matching(CoordinateMatch::Within(-1.)));

        assert!(matches!(
            result,
            Err(Error::InvalidParameter { field, .. }) if field == "match_tolerance"
        ));
    }
}
