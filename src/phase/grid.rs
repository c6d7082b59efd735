//! Phase profiles given directly as a grid of phase values.

use super::{PhaseProfile, PhaseProfileData, PhaseType};
use crate::{
    error::{PhaseGridError, Result},
    field::ScalarField2,
    geometry::{Dim2, In3D},
    interpolation::{GridInterpolator, InterpolatorConfig},
};
use ndarray::prelude::*;

/// A phase profile whose phase is interpolated directly from grid values.
///
/// The phase does not depend on the wavelength.
#[derive(Clone, Debug)]
pub struct GridPhaseProfile {
    interpolator: GridInterpolator,
    config: InterpolatorConfig,
}

impl GridPhaseProfile {
    /// Creates a new grid phase profile using the default interpolator configuration.
    ///
    /// `phase_grid` must have shape `(len(y_coords), len(x_coords))`.
    pub fn new(x_coords: Vec<f64>, y_coords: Vec<f64>, phase_grid: Array2<f64>) -> Result<Self> {
        Self::new_with_config(x_coords, y_coords, phase_grid, InterpolatorConfig::default())
    }

    /// Creates a new grid phase profile using the given interpolator configuration.
    pub fn new_with_config(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        phase_grid: Array2<f64>,
        config: InterpolatorConfig,
    ) -> Result<Self> {
        let field = ScalarField2::from_coords(x_coords, y_coords, phase_grid)?;
        Self::from_field(field, config)
    }

    /// Creates a new grid phase profile for the given field of phase values.
    pub fn from_field(field: ScalarField2, config: InterpolatorConfig) -> Result<Self> {
        let interpolator = GridInterpolator::new(field, &config)?;
        Ok(Self {
            interpolator,
            config,
        })
    }

    /// Reconstructs a grid phase profile from its serializable representation,
    /// using the default interpolator configuration.
    pub fn from_data(data: PhaseProfileData) -> Result<Self> {
        Self::from_data_with_config(data, InterpolatorConfig::default())
    }

    /// Reconstructs a grid phase profile from its serializable representation.
    ///
    /// Fails with [`PhaseGridError::WrongPhaseType`] if the data describes
    /// another kind of profile.
    pub fn from_data_with_config(
        data: PhaseProfileData,
        config: InterpolatorConfig,
    ) -> Result<Self> {
        match data {
            PhaseProfileData::Grid {
                x_coords,
                y_coords,
                phase_grid,
            } => Self::from_field(
                ScalarField2::from_nested_rows(x_coords, y_coords, &phase_grid)?,
                config,
            ),
            other => Err(PhaseGridError::WrongPhaseType {
                expected: PhaseType::Grid,
                found: other.phase_type(),
            }),
        }
    }

    /// Returns the x-coordinates of the grid.
    pub fn x_coords(&self) -> &[f64] {
        self.interpolator.field().coords(Dim2::X)
    }

    /// Returns the y-coordinates of the grid.
    pub fn y_coords(&self) -> &[f64] {
        self.interpolator.field().coords(Dim2::Y)
    }

    /// Returns the phase values at the grid nodes.
    pub fn phase_grid(&self) -> &Array2<f64> {
        self.interpolator.field().values()
    }

    /// Returns the interpolator of the phase grid.
    pub fn interpolator(&self) -> &GridInterpolator {
        &self.interpolator
    }

    /// Returns the configuration the interpolator was built with.
    pub fn config(&self) -> &InterpolatorConfig {
        &self.config
    }
}

impl PhaseProfile for GridPhaseProfile {
    fn phase_type(&self) -> PhaseType {
        PhaseType::Grid
    }

    fn is_achromatic(&self) -> bool {
        true
    }

    fn phase(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
        _wavelength: ArrayViewD<f64>,
    ) -> ArrayD<f64> {
        self.interpolator.height(&x, &y)
    }

    fn phase_gradient(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
        _wavelength: ArrayViewD<f64>,
    ) -> In3D<ArrayD<f64>> {
        let dphase_dz = ArrayD::zeros(x.raw_dim());
        In3D::from_in2d_and_z(self.interpolator.gradient(&x, &y), dphase_dz)
    }

    fn paraxial_phase_gradient(
        &self,
        y: ArrayViewD<f64>,
        _wavelength: ArrayViewD<f64>,
    ) -> ArrayD<f64> {
        let x = ArrayD::zeros(y.raw_dim());
        let (_, dphase_dy) = self.interpolator.gradient(&x, &y).into_tuple();
        dphase_dy
    }

    fn to_data(&self) -> PhaseProfileData {
        let field = self.interpolator.field();
        PhaseProfileData::Grid {
            x_coords: self.x_coords().to_vec(),
            y_coords: self.y_coords().to_vec(),
            phase_grid: field.to_nested_rows(),
        }
    }
}
