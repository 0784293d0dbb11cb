#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

//! Flag unmeasured locations whose interpolated air-quality index is not yet trustworthy.
//!
//! Sparse AQI readings are interpolated with a Gaussian process over (latitude, longitude).
//! Each query location gets a predictive mean and standard deviation, and the ratio of the two
//! decides whether the location still needs sensor coverage.
//!
//! ```
//! use aqi_uncertainty::{estimate, Coordinate, Observation};
//!
//! let observations = vec![
//!     Observation::new(Coordinate::new(0., 0.), 10.),
//!     Observation::new(Coordinate::new(1., 1.), 20.),
//! ];
//! let queries = vec![Coordinate::new(0.5, 0.5), Coordinate::new(5., 5.)];
//!
//! let uncertain = estimate(&observations, &queries, 0.2).unwrap();
//! assert_eq!(uncertain, vec![Coordinate::new(0.5, 0.5)]);
//! ```

extern crate blas_src;

pub mod config;
pub mod error;
pub mod estimate;
pub mod io;
pub mod kernel;
pub mod location;
pub mod margin;
pub(crate) mod math;
pub mod regression;

pub use config::Config;
pub use error::Error;
pub use estimate::{estimate, Estimator};
pub use kernel::Kernel;
pub use location::{Coordinate, CoordinateMatch, Observation};
pub use margin::{Assessment, Prediction, Verdict};

pub type Result<T> = ::std::result::Result<T, Error>;
