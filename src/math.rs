use ndarray::{Array1, Array2};

use crate::location::Coordinate;
use crate::Result;

/// Build the (n x 2) feature matrix for `locations`
///
/// Each row holds the latitude and longitude of one location, in the order given.
pub(crate) fn feature_matrix(locations: &[Coordinate]) -> Result<Array2<f64>> {
    let vals = locations.iter().flat_map(Coordinate::as_feature);

    Ok(Array1::from_iter(vals).into_shape((locations.len(), 2))?)
}

/// Affine map taking targets to zero mean and unit variance
///
/// The scale is the population standard deviation of the training targets. When every target is
/// identical the scale would vanish, so it is replaced by unity and the map reduces to a shift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Standardisation {
    pub(crate) mean: f64,
    pub(crate) scale: f64,
}

impl Standardisation {
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub(crate) fn fit(targets: &Array1<f64>) -> Self {
        let n = targets.len() as f64;
        let mean = targets.sum() / n;
        let variance = targets.mapv(|y| (y - mean).powi(2)).sum() / n;
        let scale = variance.sqrt();

        Self {
            mean,
            scale: if scale == 0. { 1. } else { scale },
        }
    }

    pub(crate) fn standardise(&self, targets: &Array1<f64>) -> Array1<f64> {
        targets.mapv(|y| (y - self.mean) / self.scale)
    }

    pub(crate) fn restore_mean(&self, standardised: &Array1<f64>) -> Array1<f64> {
        standardised.mapv(|y| y.mul_add(self.scale, self.mean))
    }

    pub(crate) fn restore_variance(&self, standardised: &Array1<f64>) -> Array1<f64> {
        standardised * self.scale.powi(2)
    }
}
