//! Bilinear sampling in a normalized coordinate frame, differentiated
//! with forward-mode automatic differentiation.

use super::Interpolator2;
use crate::{
    field::ScalarField2,
    geometry::{Dim2, In2D},
    grid::{BoundsCrossing, RectilinearGrid2},
};
use ndarray::prelude::*;
use num_dual::{Dual64, DualNum};

/// A 2D interpolator that samples the field bilinearly after mapping the
/// coordinates onto [-1, 1], with the outermost nodes aligned to the ends
/// of that range.
///
/// Points outside the grid are clamped onto the border before sampling.
/// Partial derivatives are obtained by evaluating the sampler on dual numbers.
#[derive(Clone, Debug)]
pub struct BilinearSamplingInterpolator2 {
    lower_bounds: In2D<f64>,
    extents: In2D<f64>,
    normalized_grid: RectilinearGrid2,
    values: Array2<f64>,
}

impl BilinearSamplingInterpolator2 {
    /// Prepares a sampler for the given field.
    pub fn new(field: &ScalarField2) -> Self {
        let grid = field.grid();
        Self {
            lower_bounds: grid.lower_bounds().clone(),
            extents: grid.extents().clone(),
            normalized_grid: grid.normalized(),
            values: field.values().clone(),
        }
    }

    /// Samples the field bilinearly at the given coordinates.
    ///
    /// # Parameters
    ///
    /// - `x`: Coordinate along the x-axis, in the unit of the grid.
    /// - `y`: Coordinate along the y-axis, in the unit of the grid.
    ///
    /// # Returns
    ///
    /// The sampled field value. When the coordinates are dual numbers, their
    /// derivative parts carry the derivatives of the sampled value.
    ///
    /// # Type parameters
    ///
    /// - `F`: Real or dual number type of the coordinates.
    pub fn sample<F>(&self, x: F, y: F) -> F
    where
        F: DualNum<f64> + Copy,
    {
        let (i, xn) = self.normalize(Dim2::X, x);
        let (j, yn) = self.normalize(Dim2::Y, y);

        let u = self.cell_fraction(Dim2::X, i, xn);
        let t = self.cell_fraction(Dim2::Y, j, yn);
        let one = F::one();

        let value = |row: usize, column: usize| lift::<F>(self.values[[row, column]]);

        (one - u) * (one - t) * value(j, i)
            + u * (one - t) * value(j, i + 1)
            + (one - u) * t * value(j + 1, i)
            + u * t * value(j + 1, i + 1)
    }

    /// Maps a coordinate onto [-1, 1] and finds the normalized grid cell
    /// containing it.
    ///
    /// Coordinates crossing a bound are replaced by the constant bound, so
    /// clamped points have no sensitivity to the input coordinate.
    fn normalize<F>(&self, dim: Dim2, coord: F) -> (usize, F)
    where
        F: DualNum<f64> + Copy,
    {
        let normalized = (coord - lift::<F>(self.lower_bounds[dim])) * lift::<F>(2.0)
            / lift::<F>(self.extents[dim])
            - F::one();
        let (cell, crossing) = self.normalized_grid.find_grid_cell(dim, normalized.re());
        let clamped = match crossing {
            BoundsCrossing::None => normalized,
            BoundsCrossing::Lower => -F::one(),
            BoundsCrossing::Upper => F::one(),
        };
        (cell, clamped)
    }

    fn cell_fraction<F>(&self, dim: Dim2, cell: usize, normalized: F) -> F
    where
        F: DualNum<f64> + Copy,
    {
        let nodes = self.normalized_grid.coords(dim);
        (normalized - lift::<F>(nodes[cell])) / lift::<F>(nodes[cell + 1] - nodes[cell])
    }
}

impl Interpolator2 for BilinearSamplingInterpolator2 {
    fn interp_value(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y)
    }

    fn interp_gradient(&self, x: f64, y: f64) -> In2D<f64> {
        let d_dx = self.sample(Dual64::new(x, 1.0), Dual64::new(y, 0.0)).eps;
        let d_dy = self.sample(Dual64::new(x, 0.0), Dual64::new(y, 1.0)).eps;
        In2D::new(d_dx, d_dy)
    }
}

fn lift<F: DualNum<f64>>(value: f64) -> F {
    <F as From<f64>>::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sampler_for<G: Fn(f64, f64) -> f64>(
        x: &[f64],
        y: &[f64],
        g: G,
    ) -> BilinearSamplingInterpolator2 {
        let values = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| g(x[i], y[j]));
        let field = ScalarField2::from_coords(x.to_vec(), y.to_vec(), values).unwrap();
        BilinearSamplingInterpolator2::new(&field)
    }

    #[test]
    fn sampling_is_exact_at_nonuniform_nodes() {
        let x = [-3.0, -2.9, -1.0, 0.7, 4.0];
        let y = [0.1, 0.2, 0.25, 2.0];
        let g = |x: f64, y: f64| x * x - 3.0 * y + x * y * y;
        let sampler = sampler_for(&x, &y, g);
        for &yj in &y {
            for &xi in &x {
                assert_abs_diff_eq!(sampler.interp_value(xi, yj), g(xi, yj), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn sampling_reproduces_bilinear_function() {
        let x = [0.0, 0.3, 1.0, 2.0];
        let y = [-1.0, 0.5, 1.0];
        let g = |x: f64, y: f64| 1.0 + 2.0 * x - y + 0.5 * x * y;
        let sampler = sampler_for(&x, &y, g);

        let (px, py) = (1.37, 0.62);
        assert_abs_diff_eq!(sampler.interp_value(px, py), g(px, py), epsilon = 1e-12);

        assert_abs_diff_eq!(
            sampler.interp_gradient(px, py),
            In2D::new(2.0 + 0.5 * py, -1.0 + 0.5 * px),
            epsilon = 1e-12
        );
    }

    #[test]
    fn sampling_dual_coordinates_yields_directional_derivative() {
        let x = [0.0, 0.5, 1.0, 1.5];
        let y = [0.0, 1.0, 2.0];
        let sampler = sampler_for(&x, &y, |x, y| 2.0 * x - 3.0 * y + x * y);

        let (px, py) = (0.8, 1.3);
        let direction = In2D::new(0.5, -2.0);
        let sampled = sampler.sample(
            Dual64::new(px, direction[Dim2::X]),
            Dual64::new(py, direction[Dim2::Y]),
        );

        let gradient = sampler.interp_gradient(px, py);
        assert_abs_diff_eq!(sampled.re, sampler.interp_value(px, py), epsilon = 1e-14);
        assert_abs_diff_eq!(
            sampled.eps,
            direction[Dim2::X] * gradient[Dim2::X] + direction[Dim2::Y] * gradient[Dim2::Y],
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(sampled.eps, 0.5 * (2.0 + py) - 2.0 * (-3.0 + px), epsilon = 1e-12);
    }

    #[test]
    fn dual_gradient_matches_finite_difference_within_cell() {
        let x = [0.0, 0.5, 1.0, 1.5];
        let y = [0.0, 1.0, 2.0];
        let sampler = sampler_for(&x, &y, |x, y| (x * y).sin() + y * y);

        let (px, py, h) = (0.8, 1.3, 1e-5);
        let fd_x =
            (sampler.interp_value(px + h, py) - sampler.interp_value(px - h, py)) / (2.0 * h);
        let fd_y =
            (sampler.interp_value(px, py + h) - sampler.interp_value(px, py - h)) / (2.0 * h);
        assert_abs_diff_eq!(
            sampler.interp_gradient(px, py),
            In2D::new(fd_x, fd_y),
            epsilon = 1e-6
        );
    }

    #[test]
    fn points_outside_are_clamped_to_border() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0];
        let g = |x: f64, y: f64| x + 10.0 * y;
        let sampler = sampler_for(&x, &y, g);

        assert_abs_diff_eq!(sampler.interp_value(5.0, 0.5), g(2.0, 0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(sampler.interp_value(-1.0, -3.0), g(0.0, 0.0), epsilon = 1e-12);

        let gradient = sampler.interp_gradient(5.0, 0.5);
        assert_eq!(gradient[Dim2::X], 0.0);
        assert_abs_diff_eq!(gradient[Dim2::Y], 10.0, epsilon = 1e-12);

        let gradient = sampler.interp_gradient(-1.0, -3.0);
        assert_eq!(gradient, In2D::new(0.0, 0.0));
    }

    #[test]
    fn gradient_on_border_is_one_sided() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0];
        let sampler = sampler_for(&x, &y, |x, y| x * x + y);

        let gradient = sampler.interp_gradient(2.0, 1.0);
        assert!(gradient[Dim2::X].is_finite() && gradient[Dim2::Y].is_finite());
        assert_abs_diff_eq!(gradient[Dim2::X], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(gradient[Dim2::Y], 1.0, epsilon = 1e-12);
    }
}
