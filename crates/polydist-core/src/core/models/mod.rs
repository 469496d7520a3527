//! Value types shared across the analysis pipeline.
//!
//! - [`lattice`] - Periodic cell and fractional/Cartesian conversions
//! - [`structure`] - Atomic sites arranged in a periodic cell
//! - [`molecule`] - Dimensionless local point clouds and ideal references

pub mod lattice;
pub mod molecule;
pub mod structure;
