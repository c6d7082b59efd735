//! Phase profiles derived from a height map and a dispersive material.

use super::{broadcast_to, PhaseProfile, PhaseProfileData, PhaseType};
use crate::{
    error::{PhaseGridError, Result},
    field::ScalarField2,
    geometry::{Dim2, In2D, In3D},
    interpolation::{GridInterpolator, InterpolatorConfig},
    material::Material,
};
use log::warn;
use ndarray::{prelude::*, Zip};
use std::{f64::consts::PI, sync::Arc};

/// Factor converting wavelengths in micrometers to the millimeter unit of
/// the height map.
const MICROMETERS_TO_MILLIMETERS: f64 = 1e-3;

/// A phase profile given by the optical path difference of a surface relief
/// of the given material in air.
///
/// The phase is
///
/// `phi(x, y, lambda) = 2*pi/lambda * (n(lambda) - 1) * h(x, y)`,
///
/// with heights `h` in millimeters and the wavelength `lambda` in
/// micrometers, converted to millimeters before use.
#[derive(Clone, Debug)]
pub struct HeightProfile {
    interpolator: GridInterpolator,
    material: Arc<dyn Material>,
    config: InterpolatorConfig,
}

impl HeightProfile {
    /// Creates a new height profile using the default interpolator configuration.
    ///
    /// `height_map` must have shape `(len(y_coords), len(x_coords))`.
    pub fn new(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        height_map: Array2<f64>,
        material: Arc<dyn Material>,
    ) -> Result<Self> {
        Self::new_with_config(
            x_coords,
            y_coords,
            height_map,
            material,
            InterpolatorConfig::default(),
        )
    }

    /// Creates a new height profile using the given interpolator configuration.
    pub fn new_with_config(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        height_map: Array2<f64>,
        material: Arc<dyn Material>,
        config: InterpolatorConfig,
    ) -> Result<Self> {
        let field = ScalarField2::from_coords(x_coords, y_coords, height_map)?;
        Self::from_field(field, material, config)
    }

    /// Creates a new height profile for the given field of heights.
    pub fn from_field(
        field: ScalarField2,
        material: Arc<dyn Material>,
        config: InterpolatorConfig,
    ) -> Result<Self> {
        let interpolator = GridInterpolator::new(field, &config)?;
        Ok(Self {
            interpolator,
            material,
            config,
        })
    }

    /// Reconstructs a height profile from its serializable representation and
    /// the given material, using the default interpolator configuration.
    pub fn from_data(data: PhaseProfileData, material: Arc<dyn Material>) -> Result<Self> {
        Self::from_data_with_config(data, material, InterpolatorConfig::default())
    }

    /// Reconstructs a height profile from its serializable representation.
    ///
    /// The data only records the name of the material, so the material itself
    /// must be supplied.
    ///
    /// Fails with [`PhaseGridError::WrongPhaseType`] if the data describes
    /// another kind of profile.
    pub fn from_data_with_config(
        data: PhaseProfileData,
        material: Arc<dyn Material>,
        config: InterpolatorConfig,
    ) -> Result<Self> {
        match data {
            PhaseProfileData::HeightProfile {
                x_coords,
                y_coords,
                height_map,
                material: material_name,
            } => {
                if material_name != material.name() {
                    warn!(
                        "Height profile recorded with material {} is reconstructed with {}",
                        material_name,
                        material.name()
                    );
                }
                Self::from_field(
                    ScalarField2::from_nested_rows(x_coords, y_coords, &height_map)?,
                    material,
                    config,
                )
            }
            other => Err(PhaseGridError::WrongPhaseType {
                expected: PhaseType::HeightProfile,
                found: other.phase_type(),
            }),
        }
    }

    /// Returns the x-coordinates of the height map.
    pub fn x_coords(&self) -> &[f64] {
        self.interpolator.field().coords(Dim2::X)
    }

    /// Returns the y-coordinates of the height map.
    pub fn y_coords(&self) -> &[f64] {
        self.interpolator.field().coords(Dim2::Y)
    }

    /// Returns the heights at the grid nodes.
    pub fn height_map(&self) -> &Array2<f64> {
        self.interpolator.field().values()
    }

    /// Returns the material of the surface relief.
    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    /// Returns the interpolator of the height map.
    pub fn interpolator(&self) -> &GridInterpolator {
        &self.interpolator
    }

    /// Returns the configuration the interpolator was built with.
    pub fn config(&self) -> &InterpolatorConfig {
        &self.config
    }

    /// Computes the interpolated heights at the given points.
    pub fn interpolate_height(&self, x: ArrayViewD<f64>, y: ArrayViewD<f64>) -> ArrayD<f64> {
        self.interpolator.height(&x, &y)
    }

    /// Computes the x- and y-derivatives of the interpolated heights at the given points.
    pub fn interpolate_gradient(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
    ) -> In2D<ArrayD<f64>> {
        self.interpolator.gradient(&x, &y)
    }

    /// Computes the factor `2*pi/lambda * (n(lambda) - 1)` converting heights
    /// to phase.
    ///
    /// # Parameters
    ///
    /// - `wavelength`: Array of wavelengths in micrometers.
    ///
    /// # Returns
    ///
    /// An array of conversion factors in radians per millimeter, with the same
    /// shape as `wavelength`.
    pub fn dispersion_factor(&self, wavelength: ArrayViewD<f64>) -> ArrayD<f64> {
        let n = self.material.n_array(wavelength.view());
        Zip::from(&wavelength)
            .and(&n)
            .map_collect(|&lambda, &n| 2.0 * PI / (lambda * MICROMETERS_TO_MILLIMETERS) * (n - 1.0))
    }

    /// Computes the dispersion factor for the given wavelengths, broadcast to
    /// the given coordinate shape.
    fn broadcast_factor(&self, wavelength: ArrayViewD<f64>, shape: &[usize]) -> ArrayD<f64> {
        let factor = self.dispersion_factor(wavelength);
        broadcast_to(&factor, shape, "wavelength").to_owned()
    }
}

impl PhaseProfile for HeightProfile {
    fn phase_type(&self) -> PhaseType {
        PhaseType::HeightProfile
    }

    fn is_achromatic(&self) -> bool {
        false
    }

    /// # Panics
    ///
    /// If `x` and `y` do not have the same shape, or `wavelength` can not be
    /// broadcast to that shape.
    fn phase(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
        wavelength: ArrayViewD<f64>,
    ) -> ArrayD<f64> {
        let height = self.interpolate_height(x, y);
        let factor = self.broadcast_factor(wavelength, height.shape());
        factor * height
    }

    fn phase_gradient(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
        wavelength: ArrayViewD<f64>,
    ) -> In3D<ArrayD<f64>> {
        let dphase_dz = ArrayD::zeros(x.raw_dim());
        let factor = self.broadcast_factor(wavelength, x.shape());
        let gradient = self
            .interpolate_gradient(x, y)
            .map(|dheight| &factor * &dheight);
        In3D::from_in2d_and_z(gradient, dphase_dz)
    }

    fn paraxial_phase_gradient(
        &self,
        y: ArrayViewD<f64>,
        wavelength: ArrayViewD<f64>,
    ) -> ArrayD<f64> {
        let x = ArrayD::zeros(y.raw_dim());
        let (_, dheight_dy) = self.interpolate_gradient(x.view(), y).into_tuple();
        self.broadcast_factor(wavelength, dheight_dy.shape()) * dheight_dy
    }

    fn to_data(&self) -> PhaseProfileData {
        PhaseProfileData::HeightProfile {
            x_coords: self.x_coords().to_vec(),
            y_coords: self.y_coords().to_vec(),
            height_map: self.interpolator.field().to_nested_rows(),
            material: self.material.name().to_string(),
        }
    }
}
