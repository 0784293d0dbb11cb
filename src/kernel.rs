use ndarray::{Array1, Array2, ArrayView1};

use crate::{Error, Result};

/// Constant output scale multiplied by an anisotropic squared-exponential term
///
/// $$
///     k(a, b) = \sigma^2 \exp\left(-\frac{1}{2} \sum_d \frac{(a_d - b_d)^2}{l_d^2}\right)
/// $$
///
/// The parameters are a fixed prior. They are never tuned against the data, so every fit with
/// the default kernel uses an output scale of one and unit length scales in latitude and
/// longitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    output_scale: f64,
    length_scales: [f64; 2],
}

impl Default for Kernel {
    fn default() -> Self {
        Self {
            output_scale: 1.0,
            length_scales: [1.0, 1.0],
        }
    }
}

impl Kernel {
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if any parameter is not strictly positive and finite.
    pub fn new(output_scale: f64, length_scales: [f64; 2]) -> Result<Self> {
        if !(output_scale.is_finite() && output_scale > 0.) {
            return Err(Error::invalid(
                "output_scale",
                format!("must be positive and finite, got {output_scale}"),
            ));
        }
        for (dim, length_scale) in length_scales.iter().enumerate() {
            if !(length_scale.is_finite() && *length_scale > 0.) {
                return Err(Error::invalid(
                    format!("length_scales[{dim}]"),
                    format!("must be positive and finite, got {length_scale}"),
                ));
            }
        }
        Ok(Self {
            output_scale,
            length_scales,
        })
    }

    #[must_use]
    pub const fn output_scale(&self) -> f64 {
        self.output_scale
    }

    #[must_use]
    pub const fn length_scales(&self) -> [f64; 2] {
        self.length_scales
    }

    fn evaluate(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        let scaled_distance: f64 = a
            .iter()
            .zip(b.iter())
            .zip(self.length_scales.iter())
            .map(|((a, b), l)| ((a - b) / l).powi(2))
            .sum();
        self.output_scale * (-0.5 * scaled_distance).exp()
    }

    /// Cross covariance between the rows of `x1` (n x 2) and the rows of `x2` (m x 2)
    #[must_use]
    pub fn covariance(&self, x1: &Array2<f64>, x2: &Array2<f64>) -> Array2<f64> {
        Array2::from_shape_fn((x1.nrows(), x2.nrows()), |(ii, jj)| {
            self.evaluate(x1.row(ii), x2.row(jj))
        })
    }

    /// Prior variance at every row of `x`
    #[must_use]
    pub fn diagonal(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_elem(x.nrows(), self.output_scale)
    }
}
