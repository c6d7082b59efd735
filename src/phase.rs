//! Phase profiles of optical elements defined on rectilinear grids.
//!
//! A phase profile gives the phase delay imposed on light as a function of
//! transverse position and wavelength, together with its spatial gradient.
//! Positions are in the linear unit of the grid coordinates (millimeters)
//! and wavelengths in micrometers.

pub mod grid;
pub mod height_profile;

use crate::{
    error::Result,
    geometry::In3D,
    interpolation::InterpolatorConfig,
    material::MaterialCatalog,
};
use log::debug;
use ndarray::{ArrayD, ArrayViewD};
use serde::{Deserialize, Serialize};
use std::fmt;

use grid::GridPhaseProfile;
use height_profile::HeightProfile;

/// The kinds of phase profile defined on grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    /// Phase values given directly on the grid.
    Grid,
    /// Phase derived from surface heights given on the grid.
    HeightProfile,
}

impl PhaseType {
    /// Returns the tag identifying the phase type in serialized data.
    pub fn name(&self) -> &'static str {
        match self {
            PhaseType::Grid => "grid",
            PhaseType::HeightProfile => "height_profile",
        }
    }
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Defines the properties of a phase profile.
///
/// All methods taking coordinate arrays expect `x` and `y` of equal shape and
/// return arrays of that same shape. Wavelength arrays must be broadcastable
/// to that shape.
pub trait PhaseProfile: fmt::Debug + Send + Sync {
    /// Returns the kind of the profile.
    fn phase_type(&self) -> PhaseType;

    /// Whether the phase is independent of the wavelength.
    fn is_achromatic(&self) -> bool;

    /// Computes the phase in radians at the given points and wavelengths.
    fn phase(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
        wavelength: ArrayViewD<f64>,
    ) -> ArrayD<f64>;

    /// Computes the x-, y- and z-derivatives of the phase at the given points
    /// and wavelengths. The z-derivative is zero for grid-defined profiles.
    fn phase_gradient(
        &self,
        x: ArrayViewD<f64>,
        y: ArrayViewD<f64>,
        wavelength: ArrayViewD<f64>,
    ) -> In3D<ArrayD<f64>>;

    /// Computes the y-derivative of the phase along the meridian `x = 0`.
    fn paraxial_phase_gradient(
        &self,
        y: ArrayViewD<f64>,
        wavelength: ArrayViewD<f64>,
    ) -> ArrayD<f64> {
        let x = ArrayD::zeros(y.raw_dim());
        let (_, dphase_dy, _) = self.phase_gradient(x.view(), y, wavelength).into_tuple();
        dphase_dy
    }

    /// Creates a serializable representation of the profile.
    fn to_data(&self) -> PhaseProfileData;
}

/// Serializable representation of a phase profile.
///
/// Grid values are stored as nested rows, row `i` holding the values at
/// `y_coords[i]`. A height profile only records the name of its material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase_type", rename_all = "snake_case")]
pub enum PhaseProfileData {
    Grid {
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        phase_grid: Vec<Vec<f64>>,
    },
    HeightProfile {
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        height_map: Vec<Vec<f64>>,
        material: String,
    },
}

impl PhaseProfileData {
    /// Returns the kind of profile the data describes.
    pub fn phase_type(&self) -> PhaseType {
        match self {
            PhaseProfileData::Grid { .. } => PhaseType::Grid,
            PhaseProfileData::HeightProfile { .. } => PhaseType::HeightProfile,
        }
    }

    /// Returns the name of the material recorded for a height profile.
    pub fn material_name(&self) -> Option<&str> {
        match self {
            PhaseProfileData::Grid { .. } => None,
            PhaseProfileData::HeightProfile { material, .. } => Some(material),
        }
    }

    /// Serializes the data to a JSON string.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|err| crate::error::PhaseGridError::Json(err.to_string()))
    }

    /// Parses data from a JSON string.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| crate::error::PhaseGridError::Json(err.to_string()))
    }
}

/// Reconstructs a phase profile of whichever kind the data describes.
///
/// # Parameters
///
/// - `data`: Serializable representation of the profile.
/// - `catalog`: Materials available for height profiles, looked up by the
///   material name recorded in the data.
/// - `config`: Configuration parameters for the profile's interpolator.
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains the reconstructed profile.
/// - `Err`: Contains an error encountered while resolving the material or
///   validating the grid.
pub fn profile_from_data(
    data: PhaseProfileData,
    catalog: &MaterialCatalog,
    config: &InterpolatorConfig,
) -> Result<Box<dyn PhaseProfile>> {
    let phase_type = data.phase_type();
    debug!("Reconstructing {} phase profile", phase_type);
    let profile: Box<dyn PhaseProfile> = match phase_type {
        PhaseType::Grid => Box::new(GridPhaseProfile::from_data_with_config(
            data,
            config.clone(),
        )?),
        PhaseType::HeightProfile => {
            let material = catalog.resolve(data.material_name().unwrap_or_default())?;
            Box::new(HeightProfile::from_data_with_config(
                data,
                material,
                config.clone(),
            )?)
        }
    };
    Ok(profile)
}

/// Broadcasts an array to the given shape.
///
/// # Panics
///
/// If the array is not broadcastable to the shape.
fn broadcast_to<'a>(array: &'a ArrayD<f64>, shape: &[usize], name: &str) -> ArrayViewD<'a, f64> {
    array.broadcast(shape).unwrap_or_else(|| {
        panic!(
            "Shape {:?} of {} is not broadcastable to coordinate shape {:?}.",
            array.shape(),
            name,
            shape
        )
    })
}
