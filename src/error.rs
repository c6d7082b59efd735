//! Errors raised while building grids, interpolators and phase profiles.

use crate::{geometry::Dim2, phase::PhaseType};
use thiserror::Error;

/// Errors that can occur when constructing or reconstructing a phase profile.
#[derive(Debug, Error)]
pub enum PhaseGridError {
    #[error("Unsupported numeric backend: {0} (expected \"spline\" or \"sampling\")")]
    UnsupportedBackend(String),

    #[error("The spline backend requires the `spline` feature to be enabled")]
    SplineUnavailable,

    #[error("Grid values have shape {found:?}, expected (len(y), len(x)) = {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Row {row} of the grid values has {found} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("The {dim}-axis has {count} node(s), at least 2 are required")]
    InsufficientNodes { dim: Dim2, count: usize },

    #[error("The {dim}-coordinates contain non-finite values")]
    NonFiniteCoords { dim: Dim2 },

    #[error("The {dim}-coordinates are not strictly increasing at index {index}")]
    NonIncreasingCoords { dim: Dim2, index: usize },

    #[error("Expected phase data of type \"{expected}\", got \"{found}\"")]
    WrongPhaseType {
        expected: PhaseType,
        found: PhaseType,
    },

    #[error("No material named \"{0}\" is available")]
    UnknownMaterial(String),

    #[error("Invalid phase profile JSON: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, PhaseGridError>;
