//! # polydist Core Library
//!
//! A library for computing symmetry-adapted distortion amplitudes of local
//! coordination polyhedra (octahedra) embedded in periodic crystal structures.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a strict direction of
//! dependency, keeping the geometric pipeline reusable and testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Lattice`,
//!   `Structure`, `Molecule`) and I/O for the two input records the pipeline
//!   consumes: VASP-style structure files and symmetry-basis tables.
//!
//! - **[`analysis`]: The Geometric Core.** Periodic neighbor selection,
//!   shell normalization, the correspondence-and-rotation alignment engine,
//!   and the symmetry-basis projector. Every component is a pure function of
//!   its inputs and returns typed errors.
//!
//! - **[`workflows`]: The Public API.** Ties the analysis components together
//!   into the one-call entry point [`workflows::distortion::analyze`], which
//!   turns a structure and a center atom into an ordered vector of
//!   distortion-mode amplitudes.

pub mod analysis;
pub mod core;
pub mod workflows;
