//! Interpolation of scalar fields on rectilinear 2D grids.
//!
//! A [`GridInterpolator`] evaluates a [`ScalarField2`] and its spatial
//! gradient at arbitrary points, using one of two numerical strategies
//! selected through an [`InterpolatorConfig`]:
//!
//! - [`NumericBackend::Spline`]: a bicubic interpolating spline with analytic
//!   partial derivatives. Reproduces the node values and is twice continuously
//!   differentiable in between. Outside the grid the polynomial of the nearest
//!   edge cell is extrapolated.
//! - [`NumericBackend::Sampling`]: corner-aligned bilinear sampling in a
//!   coordinate frame normalized to [-1, 1], differentiated automatically.
//!   Reproduces the node values but is only piecewise linear in between, so
//!   values and gradients away from the nodes are less accurate than with the
//!   spline. Outside the grid the coordinates are clamped to the border.

#[cfg(feature = "spline")]
pub mod bicubic_spline;
pub mod bilinear_sampling;

use crate::{
    error::{PhaseGridError, Result},
    field::ScalarField2,
    geometry::{Dim2, In2D},
};
use log::debug;
use ndarray::{Array, Array2, ArrayBase, Data, Dimension, Zip};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[cfg(feature = "spline")]
use bicubic_spline::BicubicSplineInterpolator2;
use bilinear_sampling::BilinearSamplingInterpolator2;

/// Defines the properties of a 2D interpolator that has been prepared
/// for a specific scalar field.
pub trait Interpolator2: Clone + Sync + Send {
    /// Computes the interpolated field value at the given coordinate.
    fn interp_value(&self, x: f64, y: f64) -> f64;

    /// Computes the partial derivatives of the interpolated field with
    /// respect to x and y at the given coordinate.
    fn interp_gradient(&self, x: f64, y: f64) -> In2D<f64>;
}

/// The numerical strategy used for interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericBackend {
    /// Bicubic spline with analytic derivatives.
    Spline,
    /// Bilinear sampling with automatic differentiation.
    Sampling,
}

impl NumericBackend {
    /// Returns the name used when parsing and displaying the backend.
    pub fn name(&self) -> &'static str {
        match self {
            NumericBackend::Spline => "spline",
            NumericBackend::Sampling => "sampling",
        }
    }
}

impl fmt::Display for NumericBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericBackend {
    type Err = PhaseGridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spline" => Ok(NumericBackend::Spline),
            "sampling" => Ok(NumericBackend::Sampling),
            _ => Err(PhaseGridError::UnsupportedBackend(s.to_string())),
        }
    }
}

/// Configuration parameters for grid interpolators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpolatorConfig {
    /// Numerical strategy to build the interpolator with.
    pub backend: NumericBackend,
}

impl InterpolatorConfig {
    #[cfg(feature = "spline")]
    pub const DEFAULT_BACKEND: NumericBackend = NumericBackend::Spline;
    #[cfg(not(feature = "spline"))]
    pub const DEFAULT_BACKEND: NumericBackend = NumericBackend::Sampling;

    /// Creates a configuration using the given backend.
    pub fn with_backend(backend: NumericBackend) -> Self {
        Self { backend }
    }
}

impl Default for InterpolatorConfig {
    fn default() -> Self {
        Self {
            backend: Self::DEFAULT_BACKEND,
        }
    }
}

#[derive(Clone, Debug)]
enum Strategy {
    #[cfg(feature = "spline")]
    Spline(BicubicSplineInterpolator2),
    Sampling(BilinearSamplingInterpolator2),
}

impl Interpolator2 for Strategy {
    fn interp_value(&self, x: f64, y: f64) -> f64 {
        match self {
            #[cfg(feature = "spline")]
            Strategy::Spline(interpolator) => interpolator.interp_value(x, y),
            Strategy::Sampling(interpolator) => interpolator.interp_value(x, y),
        }
    }

    fn interp_gradient(&self, x: f64, y: f64) -> In2D<f64> {
        match self {
            #[cfg(feature = "spline")]
            Strategy::Spline(interpolator) => interpolator.interp_gradient(x, y),
            Strategy::Sampling(interpolator) => interpolator.interp_gradient(x, y),
        }
    }
}

/// Interpolator for a scalar field on a rectilinear 2D grid.
///
/// Built once for a field and immutable afterwards, so it can be shared
/// between threads for concurrent evaluation.
#[derive(Clone, Debug)]
pub struct GridInterpolator {
    field: ScalarField2,
    backend: NumericBackend,
    strategy: Strategy,
}

impl GridInterpolator {
    /// Creates a new interpolator for the given field using the backend
    /// selected in the configuration.
    ///
    /// # Parameters
    ///
    /// - `field`: Scalar field to interpolate.
    /// - `config`: Configuration parameters for the interpolator.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the prepared interpolator.
    /// - `Err`: [`PhaseGridError::SplineUnavailable`] if the spline backend is
    ///   requested but was not compiled in.
    pub fn new(field: ScalarField2, config: &InterpolatorConfig) -> Result<Self> {
        let strategy = match config.backend {
            NumericBackend::Spline => Self::spline_strategy(&field)?,
            NumericBackend::Sampling => {
                Strategy::Sampling(BilinearSamplingInterpolator2::new(&field))
            }
        };
        let grid = field.grid();
        debug!(
            "Built {} interpolator for {}x{} grid spanning x in [{}, {}], y in [{}, {}]",
            config.backend,
            grid.shape()[Dim2::X],
            grid.shape()[Dim2::Y],
            grid.lower_bounds()[Dim2::X],
            grid.upper_bounds()[Dim2::X],
            grid.lower_bounds()[Dim2::Y],
            grid.upper_bounds()[Dim2::Y]
        );
        Ok(Self {
            field,
            backend: config.backend,
            strategy,
        })
    }

    /// Creates a new interpolator from coordinate arrays and a value array of
    /// shape `(len(y_coords), len(x_coords))`.
    pub fn from_coords(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        values: Array2<f64>,
        config: &InterpolatorConfig,
    ) -> Result<Self> {
        Self::new(ScalarField2::from_coords(x_coords, y_coords, values)?, config)
    }

    #[cfg(feature = "spline")]
    fn spline_strategy(field: &ScalarField2) -> Result<Strategy> {
        Ok(Strategy::Spline(BicubicSplineInterpolator2::new(field)))
    }

    #[cfg(not(feature = "spline"))]
    fn spline_strategy(_field: &ScalarField2) -> Result<Strategy> {
        Err(PhaseGridError::SplineUnavailable)
    }

    /// Returns a reference to the interpolated field.
    pub fn field(&self) -> &ScalarField2 {
        &self.field
    }

    /// Returns the backend the interpolator was built with.
    pub fn backend(&self) -> NumericBackend {
        self.backend
    }

    /// Computes the interpolated value at a single point.
    pub fn height_at(&self, x: f64, y: f64) -> f64 {
        self.strategy.interp_value(x, y)
    }

    /// Computes the partial derivatives with respect to x and y at a single point.
    pub fn gradient_at(&self, x: f64, y: f64) -> In2D<f64> {
        self.strategy.interp_gradient(x, y)
    }

    /// Computes the interpolated values at the given points.
    ///
    /// # Parameters
    ///
    /// - `x`: Array of x-coordinates.
    /// - `y`: Array of y-coordinates, with the same shape as `x`.
    ///
    /// # Returns
    ///
    /// An array of interpolated values with the same shape as the coordinate arrays.
    ///
    /// # Type parameters
    ///
    /// - `S`: Data type of the x-coordinate array.
    /// - `T`: Data type of the y-coordinate array.
    /// - `D`: Dimensionality of the coordinate arrays.
    ///
    /// # Panics
    ///
    /// If `x` and `y` do not have the same shape.
    pub fn height<S, T, D>(&self, x: &ArrayBase<S, D>, y: &ArrayBase<T, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
        D: Dimension,
    {
        assert_eq!(
            x.shape(),
            y.shape(),
            "Coordinate arrays for x and y must have the same shape."
        );
        Zip::from(x)
            .and(y)
            .par_map_collect(|&x, &y| self.strategy.interp_value(x, y))
    }

    /// Computes the partial derivatives with respect to x and y at the given points.
    ///
    /// # Parameters
    ///
    /// - `x`: Array of x-coordinates.
    /// - `y`: Array of y-coordinates, with the same shape as `x`.
    ///
    /// # Returns
    ///
    /// The x- and y-derivatives, each an array with the same shape as the
    /// coordinate arrays.
    ///
    /// # Type parameters
    ///
    /// - `S`: Data type of the x-coordinate array.
    /// - `T`: Data type of the y-coordinate array.
    /// - `D`: Dimensionality of the coordinate arrays.
    ///
    /// # Panics
    ///
    /// If `x` and `y` do not have the same shape.
    pub fn gradient<S, T, D>(
        &self,
        x: &ArrayBase<S, D>,
        y: &ArrayBase<T, D>,
    ) -> In2D<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        T: Data<Elem = f64>,
        D: Dimension,
    {
        assert_eq!(
            x.shape(),
            y.shape(),
            "Coordinate arrays for x and y must have the same shape."
        );
        let mut dx = Array::zeros(x.raw_dim());
        let mut dy = Array::zeros(x.raw_dim());
        Zip::from(&mut dx)
            .and(&mut dy)
            .and(x)
            .and(y)
            .par_for_each(|dx, dy, &x, &y| {
                let (grad_x, grad_y) = self.strategy.interp_gradient(x, y).into_tuple();
                *dx = grad_x;
                *dy = grad_y;
            });
        In2D::new(dx, dy)
    }
}
