//! Scalar fields sampled on rectilinear 2D grids.

use crate::{
    error::{PhaseGridError, Result},
    geometry::{Dim2, In2D},
    grid::RectilinearGrid2,
};
use ndarray::prelude::*;
use std::sync::Arc;

#[cfg(any(test, feature = "for-testing"))]
use approx::AbsDiffEq;

/// A 2D scalar field.
///
/// Holds the grid and the values of the field at the grid nodes.
/// The array of values has shape `(len(y), len(x))`, so the row index
/// corresponds to y and the column index to x.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField2 {
    grid: Arc<RectilinearGrid2>,
    values: Array2<f64>,
}

impl ScalarField2 {
    /// Creates a new scalar field given a grid and the values at its nodes.
    ///
    /// Fails if the shape of the values is not `(len(y), len(x))`.
    pub fn new(grid: Arc<RectilinearGrid2>, values: Array2<f64>) -> Result<Self> {
        let shape = grid.shape();
        let expected = (shape[Dim2::Y], shape[Dim2::X]);
        let found = values.dim();
        if found != expected {
            return Err(PhaseGridError::ShapeMismatch { expected, found });
        }
        Ok(Self { grid, values })
    }

    /// Creates a new scalar field from coordinate arrays and a value array,
    /// validating all of them.
    pub fn from_coords(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        values: Array2<f64>,
    ) -> Result<Self> {
        let grid = RectilinearGrid2::from_coords(x_coords, y_coords)?;
        Self::new(Arc::new(grid), values)
    }

    /// Creates a new scalar field from coordinate arrays and nested rows of
    /// values, where row `i` holds the values at `y_coords[i]`.
    pub fn from_nested_rows(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        rows: &[Vec<f64>],
    ) -> Result<Self> {
        let values = array_from_nested_rows(rows, x_coords.len())?;
        Self::from_coords(x_coords, y_coords, values)
    }

    /// Returns a reference to the grid.
    pub fn grid(&self) -> &RectilinearGrid2 {
        self.grid.as_ref()
    }

    /// Returns a new atomic reference counted pointer to the grid.
    pub fn arc_with_grid(&self) -> Arc<RectilinearGrid2> {
        Arc::clone(&self.grid)
    }

    /// Returns the node coordinates along the given axis.
    pub fn coords(&self, dim: Dim2) -> &[f64] {
        self.grid.coords(dim)
    }

    /// Returns a reference to the 2D array of field values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Returns the field value at the node with the given x- and y-indices.
    pub fn value(&self, indices: &In2D<usize>) -> f64 {
        self.values[[indices[Dim2::Y], indices[Dim2::X]]]
    }

    /// Returns the number of nodes along each axis.
    pub fn shape(&self) -> &In2D<usize> {
        self.grid.shape()
    }

    /// Returns the values as nested rows, row `i` holding the values at the
    /// `i`-th y-coordinate.
    pub fn to_nested_rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// Packs nested rows of equal length into a 2D array.
fn array_from_nested_rows(rows: &[Vec<f64>], row_len: usize) -> Result<Array2<f64>> {
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != row_len)
    {
        return Err(PhaseGridError::RaggedRows {
            row,
            expected: row_len,
            found,
        });
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), row_len), flat).map_err(|_| {
        PhaseGridError::ShapeMismatch {
            expected: (rows.len(), row_len),
            found: (rows.len(), row_len),
        }
    })
}

#[cfg(any(test, feature = "for-testing"))]
impl AbsDiffEq for ScalarField2 {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.grid.abs_diff_eq(&other.grid, epsilon)
            && self.values.dim() == other.values.dim()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
