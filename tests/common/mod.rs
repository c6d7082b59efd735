#![allow(dead_code)]

use ndarray::prelude::*;
use phasegrid::{
    field::ScalarField2,
    geometry::In2D,
    interpolation::{GridInterpolator, InterpolatorConfig, NumericBackend},
    material::Material,
};

/// Defines a test that runs its body once for every available backend.
#[macro_export]
macro_rules! def_backend_test {
    (fn $name:ident($backend:ident) $test_body:block) => {
        #[test]
        fn $name() {
            for $backend in common::backends() {
                $test_body
            }
        }
    };
}

/// Returns all backends compiled into the crate.
pub fn backends() -> Vec<NumericBackend> {
    let mut backends = vec![NumericBackend::Sampling];
    if cfg!(feature = "spline") {
        backends.push(NumericBackend::Spline);
    }
    backends
}

pub fn config(backend: NumericBackend) -> InterpolatorConfig {
    InterpolatorConfig::with_backend(backend)
}

/// Absolute tolerance of the x- and y-derivatives of the scenario grid
/// between nodes, accounting for the order of each backend.
pub fn gradient_tolerance(backend: NumericBackend) -> In2D<f64> {
    match backend {
        NumericBackend::Spline => In2D::new(1e-8, 1e-8),
        NumericBackend::Sampling => In2D::new(0.05, 0.15),
    }
}

/// Returns the coordinates and values of `x^2 + y^3` sampled on a 50x50 grid
/// covering `[-1, 1] x [-2, 2]`.
pub fn scenario_grid() -> (Vec<f64>, Vec<f64>, Array2<f64>) {
    let x = Array1::<f64>::linspace(-1.0, 1.0, 50).to_vec();
    let y = Array1::<f64>::linspace(-2.0, 2.0, 50).to_vec();
    let values = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| x[i].powi(2) + y[j].powi(3));
    (x, y, values)
}

pub fn scenario_interpolator(backend: NumericBackend) -> GridInterpolator {
    let (x, y, values) = scenario_grid();
    GridInterpolator::from_coords(x, y, values, &config(backend)).unwrap()
}

/// Returns a smooth function sampled on a grid with irregular node spacing.
pub fn nonuniform_field() -> ScalarField2 {
    let x = vec![-2.0, -1.7, -0.9, -0.2, 0.0, 0.35, 1.1, 1.6, 2.5];
    let y = vec![-1.0, -0.8, -0.1, 0.4, 0.45, 1.2, 2.0];
    let values = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| smooth_function(x[i], y[j]));
    ScalarField2::from_coords(x, y, values).unwrap()
}

pub fn smooth_function(x: f64, y: f64) -> f64 {
    (1.3 * x).sin() * (0.7 * y).cos() + 0.1 * x * y
}

/// Approximates the gradient of the given function with centered differences.
pub fn finite_difference_gradient<F>(f: F, x: f64, y: f64, step: f64) -> (f64, f64)
where
    F: Fn(f64, f64) -> f64,
{
    (
        (f(x + step, y) - f(x - step, y)) / (2.0 * step),
        (f(x, y + step) - f(x, y - step)) / (2.0 * step),
    )
}

pub fn dyn_array(values: &[f64]) -> ArrayD<f64> {
    Array1::from(values.to_vec()).into_dyn()
}

/// A material following a two-term Cauchy dispersion law.
#[derive(Clone, Debug)]
pub struct CauchyMaterial {
    pub name: String,
    pub a: f64,
    pub b: f64,
}

impl Material for CauchyMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn n(&self, wavelength: f64) -> f64 {
        self.a + self.b / (wavelength * wavelength)
    }
}
