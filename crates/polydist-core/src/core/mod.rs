//! Foundation layer: stateless data models and input-file handling.

pub mod io;
pub mod models;
