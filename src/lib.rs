//! The `phasegrid` crate provides differentiable phase and height profiles
//! sampled on rectilinear 2D grids.
pub mod error;
pub mod geometry;
pub mod grid;
pub mod field;
pub mod interpolation;
pub mod material;
pub mod phase;
