//! Rectilinear 2D grids.

use crate::{
    error::{PhaseGridError, Result},
    geometry::{Dim2, In2D},
};

#[cfg(any(test, feature = "for-testing"))]
use approx::AbsDiffEq;

/// A potential crossing of the lower or upper bound of a grid dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsCrossing {
    None,
    Lower,
    Upper,
}

/// A 2D grid whose nodes lie on the tensor product of two strictly
/// increasing coordinate arrays. The spacing along each axis may vary.
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearGrid2 {
    coords: In2D<Vec<f64>>,
    shape: In2D<usize>,
    lower_bounds: In2D<f64>,
    upper_bounds: In2D<f64>,
    extents: In2D<f64>,
}

impl RectilinearGrid2 {
    /// Creates a new grid from the node coordinates along each axis.
    ///
    /// Each coordinate array must hold at least two finite, strictly
    /// increasing values.
    pub fn from_coords(x_coords: Vec<f64>, y_coords: Vec<f64>) -> Result<Self> {
        validate_coords(Dim2::X, &x_coords)?;
        validate_coords(Dim2::Y, &y_coords)?;
        Ok(Self::from_coords_unchecked(In2D::new(x_coords, y_coords)))
    }

    fn from_coords_unchecked(coords: In2D<Vec<f64>>) -> Self {
        let shape = In2D::with_each_component(|dim| coords[dim].len());
        let lower_bounds = In2D::with_each_component(|dim| coords[dim][0]);
        let upper_bounds = In2D::with_each_component(|dim| coords[dim][shape[dim] - 1]);
        let extents = In2D::with_each_component(|dim| upper_bounds[dim] - lower_bounds[dim]);
        Self {
            coords,
            shape,
            lower_bounds,
            upper_bounds,
            extents,
        }
    }

    /// Returns the number of nodes along each axis.
    pub fn shape(&self) -> &In2D<usize> {
        &self.shape
    }

    /// Returns the node coordinates along the given axis.
    pub fn coords(&self, dim: Dim2) -> &[f64] {
        &self.coords[dim]
    }

    /// Returns the smallest node coordinate along each axis.
    pub fn lower_bounds(&self) -> &In2D<f64> {
        &self.lower_bounds
    }

    /// Returns the largest node coordinate along each axis.
    pub fn upper_bounds(&self) -> &In2D<f64> {
        &self.upper_bounds
    }

    /// Returns the distance between the outermost nodes along each axis.
    pub fn extents(&self) -> &In2D<f64> {
        &self.extents
    }

    /// Creates a grid with the same relative node spacing, but with the
    /// coordinates along each axis mapped linearly onto [-1, 1].
    ///
    /// The outermost nodes map exactly onto -1 and 1.
    pub fn normalized(&self) -> Self {
        let coords = In2D::with_each_component(|dim| {
            let size = self.shape[dim];
            self.coords[dim]
                .iter()
                .enumerate()
                .map(|(idx, &coord)| {
                    if idx == 0 {
                        -1.0
                    } else if idx == size - 1 {
                        1.0
                    } else {
                        2.0 * (coord - self.lower_bounds[dim]) / self.extents[dim] - 1.0
                    }
                })
                .collect()
        });
        Self::from_coords_unchecked(coords)
    }

    /// Finds the index of the grid cell along the given axis that contains
    /// the given coordinate, or the closest cell if the coordinate lies
    /// outside the grid.
    ///
    /// Cell `i` spans the nodes `i` and `i + 1`. A coordinate exactly on the
    /// upper bound belongs to the last cell.
    ///
    /// # Parameters
    ///
    /// - `dim`: Axis to search along.
    /// - `coord`: Coordinate to find the cell for.
    ///
    /// # Returns
    ///
    /// A tuple containing:
    ///
    /// - `usize`: Index of the containing or closest cell.
    /// - `BoundsCrossing`: The bound crossed by the coordinate, if any.
    pub fn find_grid_cell(&self, dim: Dim2, coord: f64) -> (usize, BoundsCrossing) {
        let coords = &self.coords[dim];
        let last_cell = coords.len() - 2;

        let crossing = if coord < self.lower_bounds[dim] {
            BoundsCrossing::Lower
        } else if coord > self.upper_bounds[dim] {
            BoundsCrossing::Upper
        } else {
            BoundsCrossing::None
        };

        let idx = coords.partition_point(|&node| node <= coord);
        (idx.saturating_sub(1).min(last_cell), crossing)
    }
}

fn validate_coords(dim: Dim2, coords: &[f64]) -> Result<()> {
    if coords.len() < 2 {
        return Err(PhaseGridError::InsufficientNodes {
            dim,
            count: coords.len(),
        });
    }
    if coords.iter().any(|coord| !coord.is_finite()) {
        return Err(PhaseGridError::NonFiniteCoords { dim });
    }
    if let Some(index) = coords.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(PhaseGridError::NonIncreasingCoords {
            dim,
            index: index + 1,
        });
    }
    Ok(())
}

#[cfg(any(test, feature = "for-testing"))]
impl AbsDiffEq for RectilinearGrid2 {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Dim2::slice().iter().all(|&dim| {
            self.shape[dim] == other.shape[dim]
                && self.coords[dim]
                    .iter()
                    .zip(other.coords[dim].iter())
                    .all(|(a, b)| a.abs_diff_eq(b, epsilon))
        })
    }
}
