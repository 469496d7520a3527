//! The geometric analysis stages between a raw structure and a set of mode
//! amplitudes.
//!
//! - [`neighbors`] - Periodic coordination-shell search
//! - [`shell`] - Normalization of a shell into a dimensionless molecule
//! - [`assignment`] - Minimum-cost vertex correspondence
//! - [`align`] - Joint permutation and rotation fit against the ideal shape
//! - [`projection`] - Projection of the residual onto symmetry modes

pub mod align;
pub mod assignment;
pub mod error;
pub mod neighbors;
pub mod projection;
pub mod shell;
