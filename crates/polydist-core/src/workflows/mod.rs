//! High-level entry points that drive the full analysis pipeline.

pub mod distortion;
