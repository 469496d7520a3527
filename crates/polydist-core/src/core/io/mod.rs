//! Input-file handling for the two records the pipeline consumes.
//!
//! - [`basis`] - Symmetry-adapted basis tables (built-in set + JSON loader)
//! - [`poscar`] - VASP-style periodic structure files

pub mod basis;
pub mod poscar;
