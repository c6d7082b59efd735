//! Interpolation with a bicubic spline.

use super::Interpolator2;
use crate::{
    field::ScalarField2,
    geometry::{Dim2, In2D},
    grid::RectilinearGrid2,
};
use log::warn;
use ndarray::prelude::*;
use ndarray::Zip;
use std::sync::Arc;

/// A 2D interpolator using a tensor-product cubic spline through all grid
/// nodes, with not-a-knot end conditions along each axis.
///
/// The spline is stored as the node values together with the second
/// derivatives `d2/dx2`, `d2/dy2` and `d4/dx2dy2` at every node, which fully
/// determine the bicubic polynomial in each grid cell.
#[derive(Clone, Debug)]
pub struct BicubicSplineInterpolator2 {
    grid: Arc<RectilinearGrid2>,
    values: Array2<f64>,
    d2_dx2: Array2<f64>,
    d2_dy2: Array2<f64>,
    d4_dx2dy2: Array2<f64>,
}

impl BicubicSplineInterpolator2 {
    /// Fits a new bicubic spline to the given field.
    pub fn new(field: &ScalarField2) -> Self {
        let grid = field.arc_with_grid();
        let values = field.values().clone();

        for dim in Dim2::slice() {
            let size = grid.shape()[dim];
            if size < 4 {
                warn!(
                    "Only {} nodes along {}-axis, spline is of degree {} along it",
                    size,
                    dim,
                    size - 1
                );
            }
        }

        let x_coords = grid.coords(Dim2::X);
        let y_coords = grid.coords(Dim2::Y);

        let mut d2_dx2 = Array2::zeros(values.raw_dim());
        Zip::from(d2_dx2.rows_mut())
            .and(values.rows())
            .par_for_each(|mut derivatives, row| {
                derivatives.assign(&spline_second_derivatives(x_coords, row))
            });

        let mut d2_dy2 = Array2::zeros(values.raw_dim());
        Zip::from(d2_dy2.columns_mut())
            .and(values.columns())
            .par_for_each(|mut derivatives, column| {
                derivatives.assign(&spline_second_derivatives(y_coords, column))
            });

        let mut d4_dx2dy2 = Array2::zeros(values.raw_dim());
        Zip::from(d4_dx2dy2.columns_mut())
            .and(d2_dx2.columns())
            .par_for_each(|mut derivatives, column| {
                derivatives.assign(&spline_second_derivatives(y_coords, column))
            });

        Self {
            grid,
            values,
            d2_dx2,
            d2_dy2,
            d4_dx2dy2,
        }
    }

    /// Combines the weights of the x- and y-basis functions with the stored
    /// node data of the cell with the given lower indices.
    fn combine(&self, wx: &CubicWeights, wy: &CubicWeights, i: usize, j: usize) -> f64 {
        let mut sum = 0.0;
        for q in 0..2 {
            for p in 0..2 {
                let idx = [j + q, i + p];
                sum += wx.value[p] * wy.value[q] * self.values[idx]
                    + wx.curvature[p] * wy.value[q] * self.d2_dx2[idx]
                    + wx.value[p] * wy.curvature[q] * self.d2_dy2[idx]
                    + wx.curvature[p] * wy.curvature[q] * self.d4_dx2dy2[idx];
            }
        }
        sum
    }

    fn cell(&self, x: f64, y: f64) -> (usize, usize) {
        let (i, _) = self.grid.find_grid_cell(Dim2::X, x);
        let (j, _) = self.grid.find_grid_cell(Dim2::Y, y);
        (i, j)
    }
}

impl Interpolator2 for BicubicSplineInterpolator2 {
    fn interp_value(&self, x: f64, y: f64) -> f64 {
        let (i, j) = self.cell(x, y);
        let wx = CubicWeights::new(self.grid.coords(Dim2::X), i, x);
        let wy = CubicWeights::new(self.grid.coords(Dim2::Y), j, y);
        self.combine(&wx, &wy, i, j)
    }

    fn interp_gradient(&self, x: f64, y: f64) -> In2D<f64> {
        let (i, j) = self.cell(x, y);
        let x_coords = self.grid.coords(Dim2::X);
        let y_coords = self.grid.coords(Dim2::Y);
        let wx = CubicWeights::new(x_coords, i, x);
        let wy = CubicWeights::new(y_coords, j, y);
        In2D::new(
            self.combine(&CubicWeights::derivative(x_coords, i, x), &wy, i, j),
            self.combine(&wx, &CubicWeights::derivative(y_coords, j, y), i, j),
        )
    }
}

/// Weights of the cubic spline basis functions within one cell, for the
/// node values and for the node second derivatives.
#[derive(Clone, Copy, Debug)]
struct CubicWeights {
    value: [f64; 2],
    curvature: [f64; 2],
}

impl CubicWeights {
    fn new(coords: &[f64], cell: usize, coord: f64) -> Self {
        let (span, lower, upper) = Self::fractions(coords, cell, coord);
        let span_sqr_6 = span * span / 6.0;
        Self {
            value: [lower, upper],
            curvature: [
                (lower * lower * lower - lower) * span_sqr_6,
                (upper * upper * upper - upper) * span_sqr_6,
            ],
        }
    }

    /// Weights of the derivatives of the basis functions with respect to the coordinate.
    fn derivative(coords: &[f64], cell: usize, coord: f64) -> Self {
        let (span, lower, upper) = Self::fractions(coords, cell, coord);
        Self {
            value: [-1.0 / span, 1.0 / span],
            curvature: [
                -(3.0 * lower * lower - 1.0) * span / 6.0,
                (3.0 * upper * upper - 1.0) * span / 6.0,
            ],
        }
    }

    fn fractions(coords: &[f64], cell: usize, coord: f64) -> (f64, f64, f64) {
        let span = coords[cell + 1] - coords[cell];
        let upper = (coord - coords[cell]) / span;
        (span, 1.0 - upper, upper)
    }
}

/// Computes the second derivatives at the nodes of the cubic spline
/// interpolating the given values, using not-a-knot end conditions.
///
/// With three nodes the not-a-knot spline is the interpolating parabola,
/// with two nodes it is the connecting line.
fn spline_second_derivatives(coords: &[f64], values: ArrayView1<f64>) -> Array1<f64> {
    let size = coords.len();
    assert_eq!(size, values.len(), "Coordinates and values must have the same length.");

    if size < 3 {
        return Array1::zeros(size);
    }

    let spans: Vec<f64> = coords.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let slopes: Vec<f64> = (0..size - 1)
        .map(|idx| (values[idx + 1] - values[idx]) / spans[idx])
        .collect();

    if size == 3 {
        let curvature = 2.0 * (slopes[1] - slopes[0]) / (spans[0] + spans[1]);
        return Array1::from_elem(size, curvature);
    }

    // Unknowns are the interior second derivatives, the outer two are
    // eliminated through the not-a-knot conditions.
    let n_interior = size - 2;
    let mut sub = vec![0.0; n_interior];
    let mut diag = vec![0.0; n_interior];
    let mut sup = vec![0.0; n_interior];
    let mut rhs = vec![0.0; n_interior];

    for k in 0..n_interior {
        let idx = k + 1;
        sub[k] = spans[idx - 1];
        diag[k] = 2.0 * (spans[idx - 1] + spans[idx]);
        sup[k] = spans[idx];
        rhs[k] = 6.0 * (slopes[idx] - slopes[idx - 1]);
    }

    let (h0, h1) = (spans[0], spans[1]);
    diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
    sup[0] = (h1 * h1 - h0 * h0) / h1;

    let (ha, hb) = (spans[size - 3], spans[size - 2]);
    sub[n_interior - 1] = (ha * ha - hb * hb) / ha;
    diag[n_interior - 1] = (ha + hb) * (2.0 * ha + hb) / ha;

    let interior = solve_tridiagonal(&sub, &diag, &sup, rhs);

    let mut second_derivatives = Array1::zeros(size);
    for (k, &curvature) in interior.iter().enumerate() {
        second_derivatives[k + 1] = curvature;
    }
    second_derivatives[0] = ((h0 + h1) * interior[0] - h0 * interior[1]) / h1;
    second_derivatives[size - 1] =
        ((ha + hb) * interior[n_interior - 1] - hb * interior[n_interior - 2]) / ha;
    second_derivatives
}

/// Solves a tridiagonal linear system with the Thomas algorithm.
///
/// `sub[0]` and `sup[n - 1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], mut rhs: Vec<f64>) -> Vec<f64> {
    let n = diag.len();
    let mut modified_sup = vec![0.0; n];

    modified_sup[0] = sup[0] / diag[0];
    rhs[0] /= diag[0];
    for k in 1..n {
        let pivot = diag[k] - sub[k] * modified_sup[k - 1];
        modified_sup[k] = sup[k] / pivot;
        rhs[k] = (rhs[k] - sub[k] * rhs[k - 1]) / pivot;
    }
    for k in (0..n - 1).rev() {
        rhs[k] -= modified_sup[k] * rhs[k + 1];
    }
    rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spline_for<F: Fn(f64, f64) -> f64>(
        x: &[f64],
        y: &[f64],
        f: F,
    ) -> BicubicSplineInterpolator2 {
        let values = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| f(x[i], y[j]));
        let field = ScalarField2::from_coords(x.to_vec(), y.to_vec(), values).unwrap();
        BicubicSplineInterpolator2::new(&field)
    }

    #[test]
    fn not_a_knot_spline_reproduces_cubic() {
        let coords = [0.0, 0.5, 1.5, 2.0, 3.5, 4.0];
        let values = Array1::from_iter(coords.iter().map(|&x| x * x * x - 2.0 * x));
        let second_derivatives = spline_second_derivatives(&coords, values.view());
        for (&x, &curvature) in coords.iter().zip(second_derivatives.iter()) {
            assert_abs_diff_eq!(curvature, 6.0 * x, epsilon = 1e-9);
        }
    }

    #[test]
    fn short_axes_fall_back_to_lower_degree() {
        let line = spline_second_derivatives(&[0.0, 1.0], array![1.0, 3.0].view());
        assert_eq!(line, array![0.0, 0.0]);

        let parabola = spline_second_derivatives(&[0.0, 1.0, 3.0], array![0.0, 1.0, 9.0].view());
        for &curvature in parabola.iter() {
            assert_abs_diff_eq!(curvature, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn spline_is_exact_at_nodes() {
        let x = [-1.0, -0.3, 0.2, 0.9, 1.4];
        let y = [0.0, 0.7, 1.1, 2.5];
        let f = |x: f64, y: f64| (3.0 * x).sin() * (y * y).cos();
        let spline = spline_for(&x, &y, f);
        for &yj in &y {
            for &xi in &x {
                assert_abs_diff_eq!(spline.interp_value(xi, yj), f(xi, yj), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn spline_reproduces_bicubic_polynomial_and_derivatives() {
        let x = [-1.0, -0.5, 0.0, 0.4, 1.0, 1.3];
        let y = [-2.0, -1.0, -0.2, 0.5, 2.0];
        let f = |x: f64, y: f64| x * x * y - y * y * y + 2.0 * x * x * x * y * y;
        let spline = spline_for(&x, &y, f);

        let (px, py) = (0.23, -0.71);
        assert_abs_diff_eq!(spline.interp_value(px, py), f(px, py), epsilon = 1e-10);

        let gradient = spline.interp_gradient(px, py);
        assert_abs_diff_eq!(
            gradient[Dim2::X],
            2.0 * px * py + 6.0 * px * px * py * py,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            gradient[Dim2::Y],
            px * px - 3.0 * py * py + 4.0 * px * px * px * py,
            epsilon = 1e-9
        );
    }

    #[test]
    fn spline_extrapolates_edge_cell_polynomial() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0, 3.0];
        let spline = spline_for(&x, &y, |x, y| 2.0 * x - y);
        assert_abs_diff_eq!(spline.interp_value(4.0, -1.0), 9.0, epsilon = 1e-10);
    }
}
