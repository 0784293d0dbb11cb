use ndarray::{Array1, Array2, Axis};
use ndarray_linalg::{Cholesky, Diag, SolveTriangular, UPLO};
use tracing::{debug, warn};

use crate::kernel::Kernel;
use crate::margin::Prediction;
use crate::math::Standardisation;
use crate::{Error, Result};

/// Added to the diagonal of the training covariance to keep the Cholesky factorisation stable
pub const JITTER: f64 = 1e-10;

/// Gaussian process regressor conditioned on a fixed training set
///
/// Targets are standardised before fitting and every prediction is mapped back, so means and
/// standard deviations come out in the units of the training targets. The kernel is used as
/// given; no hyperparameters are fit.
#[derive(Clone, Debug)]
pub struct GaussianProcess {
    kernel: Kernel,
    /// Training features, one (latitude, longitude) row per observation
    features: Array2<f64>,
    /// Lower Cholesky factor `L` of `K(X, X) + jitter * I`
    factor: Array2<f64>,
    /// Dual weights `K^{-1} y` for the standardised targets
    weights: Array1<f64>,
    standardisation: Standardisation,
}

impl GaussianProcess {
    /// Condition the prior given by `kernel` on `targets` observed at the rows of `features`
    ///
    /// # Errors
    /// - [`Error::InsufficientData`] if there are no training rows
    /// - [`Error::InvalidParameter`] if `features` is not (n x 2) or `targets` has the wrong length
    /// - [`Error::Linalg`] if the training covariance is not positive definite
    pub fn fit(kernel: Kernel, features: Array2<f64>, targets: &Array1<f64>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(Error::InsufficientData(
                "a gaussian process needs at least one training point".into(),
            ));
        }
        if features.ncols() != 2 {
            return Err(Error::invalid(
                "features",
                format!("expected 2 columns, got {}", features.ncols()),
            ));
        }
        if targets.len() != features.nrows() {
            return Err(Error::invalid(
                "targets",
                format!(
                    "expected {} values to match the features, got {}",
                    features.nrows(),
                    targets.len()
                ),
            ));
        }

        let standardisation = Standardisation::fit(targets);
        let standardised = standardisation.standardise(targets);

        let mut covariance = kernel.covariance(&features, &features);
        covariance.diag_mut().mapv_inplace(|k| k + JITTER);

        let factor = covariance.cholesky(UPLO::Lower)?;
        // K^{-1} y = L^{-T} (L^{-1} y)
        let partial = factor.solve_triangular(UPLO::Lower, Diag::NonUnit, &standardised)?;
        let weights = factor.t().solve_triangular(UPLO::Upper, Diag::NonUnit, &partial)?;

        debug!(
            observations = features.nrows(),
            target_mean = standardisation.mean,
            target_scale = standardisation.scale,
            "fitted gaussian process"
        );

        Ok(Self {
            kernel,
            features,
            factor,
            weights,
            standardisation,
        })
    }

    #[must_use]
    pub const fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.features.nrows()
    }

    /// Posterior predictive mean and standard deviation at every row of `queries`
    ///
    /// All queries are handled together with a single triangular solve. The marginal values are
    /// those of predicting each row on its own.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] if `queries` does not have two columns
    /// - [`Error::Linalg`] if the triangular solve fails
    pub fn predict(&self, queries: &Array2<f64>) -> Result<Vec<Prediction>> {
        if queries.ncols() != 2 {
            return Err(Error::invalid(
                "queries",
                format!("expected 2 columns, got {}", queries.ncols()),
            ));
        }
        if queries.nrows() == 0 {
            return Ok(vec![]);
        }

        // (n x m) covariance between training points and queries
        let cross = self.kernel.covariance(&self.features, queries);
        let mean = self.standardisation.restore_mean(&cross.t().dot(&self.weights));

        let v = self.factor.solve_triangular(UPLO::Lower, Diag::NonUnit, &cross)?;
        let mut variance = self.kernel.diagonal(queries) - v.mapv(|x| x * x).sum_axis(Axis(0));

        let negative = variance.iter().filter(|&&var| var < 0.).count();
        if negative > 0 {
            warn!(
                count = negative,
                "predicted variances below zero, setting them to zero"
            );
            variance.mapv_inplace(|var| var.max(0.));
        }
        let variance = self.standardisation.restore_variance(&variance);

        Ok(mean
            .iter()
            .zip(variance.iter())
            .map(|(&mean, &variance)| Prediction {
                mean,
                standard_deviation: variance.sqrt(),
            })
            .collect())
    }
}
