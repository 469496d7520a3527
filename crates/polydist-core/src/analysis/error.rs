use thiserror::Error;

/// Represents errors that can occur during distortion analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Site index {index} out of range for structure with {sites} sites")]
    SiteIndex { index: usize, sites: usize },

    #[error(
        "Coordination shell requires {required} neighbors but only {found} \
         lie within the cutoff"
    )]
    Coordination { required: usize, found: usize },

    #[error(
        "Degenerate coordination shell: average bond length {ave_bond:.3e} \
         is below the minimum {min:.3e}"
    )]
    DegenerateShell { ave_bond: f64, min: f64 },

    #[error("Alignment failed: {0}")]
    Alignment(String),

    #[error("Basis dimension mismatch: basis vectors span {expected} components, displacement has {found}")]
    BasisDimension { expected: usize, found: usize },
}
