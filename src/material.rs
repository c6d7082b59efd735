//! Dispersive materials referenced by height-based phase profiles.

use crate::error::{PhaseGridError, Result};
use ndarray::{ArrayD, ArrayViewD};
use std::{collections::HashMap, fmt, sync::Arc};

/// Defines the properties of an optical material with a
/// wavelength-dependent refractive index.
///
/// Implementations must be safe to evaluate concurrently, since phase
/// profiles share their material between threads.
pub trait Material: fmt::Debug + Send + Sync {
    /// Returns the name identifying the material.
    fn name(&self) -> &str;

    /// Computes the refractive index at the given vacuum wavelength in micrometers.
    fn n(&self, wavelength: f64) -> f64;

    /// Computes the refractive index for each of the given wavelengths in micrometers.
    fn n_array(&self, wavelengths: ArrayViewD<f64>) -> ArrayD<f64> {
        wavelengths.mapv(|wavelength| self.n(wavelength))
    }
}

/// A non-dispersive material with the same refractive index at every wavelength.
#[derive(Clone, Debug, PartialEq)]
pub struct IdealMaterial {
    name: String,
    index: f64,
}

impl IdealMaterial {
    /// Creates a new ideal material with the given name and refractive index.
    pub fn new<S: Into<String>>(name: S, index: f64) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Returns the refractive index of the material.
    pub fn index(&self) -> f64 {
        self.index
    }
}

impl Material for IdealMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn n(&self, _wavelength: f64) -> f64 {
        self.index
    }
}

/// A caller-populated lookup table from material names to materials.
///
/// Serialized height profiles only record the name of their material, so a
/// catalog is needed to reconstruct them.
#[derive(Clone, Debug, Default)]
pub struct MaterialCatalog {
    materials: HashMap<String, Arc<dyn Material>>,
}

impl MaterialCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given material under its own name, replacing and returning
    /// any material previously registered under that name.
    pub fn register(&mut self, material: Arc<dyn Material>) -> Option<Arc<dyn Material>> {
        self.materials.insert(material.name().to_string(), material)
    }

    /// Adds the given material and returns the catalog.
    pub fn with(mut self, material: Arc<dyn Material>) -> Self {
        self.register(material);
        self
    }

    /// Returns the material registered under the given name, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Material>> {
        self.materials.get(name).cloned()
    }

    /// Returns the material registered under the given name.
    ///
    /// Fails with [`PhaseGridError::UnknownMaterial`] if there is none.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Material>> {
        self.get(name)
            .ok_or_else(|| PhaseGridError::UnknownMaterial(name.to_string()))
    }

    /// Returns the number of registered materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether no materials are registered.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
