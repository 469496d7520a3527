use polydist::analysis::error::AnalysisError;
use polydist::core::io::basis::BasisLoadError;
use polydist::core::io::poscar::PoscarError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to load basis '{path}': {source}", path = path.display())]
    Basis {
        path: PathBuf,
        #[source]
        source: BasisLoadError,
    },

    #[error("Failed to read structure '{path}': {source}", path = path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: PoscarError,
    },

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
