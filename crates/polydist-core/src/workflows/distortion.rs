use crate::analysis::align::align;
use crate::analysis::error::AnalysisError;
use crate::analysis::neighbors::{NeighborFinder, select_neighbors};
use crate::analysis::projection::{ModeAmplitude, central_displacement, project};
use crate::analysis::shell::Shell;
use crate::core::io::basis::BasisTable;
use crate::core::models::molecule::Molecule;
use crate::core::models::structure::Structure;
use tracing::{debug, instrument};

/// Number of leading basis groups that carry no shape information.
///
/// The first three irreps of a symmetry table are the breathing mode and
/// the rigid rotations/translations of the shell; their amplitudes are
/// consumed by the normalization and alignment stages and are dropped from
/// the report.
pub const TRIVIAL_IRREPS: usize = 3;

/// Label under which the central-atom displacement is reported.
pub const CENTRE_MODE_LABEL: &str = "T1u(centre)";

/// The distortion-mode amplitudes of one coordination shell.
///
/// Modes appear in basis order with the trivial groups removed, followed by
/// the central-displacement pseudo-mode. All amplitudes are dimensionless
/// and non-negative.
#[derive(Debug, Clone)]
pub struct DistortionAmplitudes {
    modes: Vec<ModeAmplitude>,
}

impl DistortionAmplitudes {
    pub fn modes(&self) -> &[ModeAmplitude] {
        &self.modes
    }

    pub fn labels(&self) -> Vec<&str> {
        self.modes.iter().map(|m| m.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.amplitude).collect()
    }
}

/// Analyzes the distortion of the coordination shell around one site.
///
/// Selects the `ideal.coordination()` strongest neighbors, normalizes them
/// into a dimensionless molecule, fits that molecule onto `ideal` over all
/// vertex correspondences and rigid rotations, and projects the remaining
/// displacement onto `basis`. The central atom's own off-centering is
/// appended as a final pseudo-mode.
#[instrument(level = "debug", skip(structure, basis, ideal, finder))]
pub fn analyze(
    structure: &Structure,
    center: usize,
    basis: &BasisTable,
    ideal: &Molecule,
    finder: &dyn NeighborFinder,
) -> Result<DistortionAmplitudes, AnalysisError> {
    let neighbors = select_neighbors(structure, center, ideal.coordination(), finder)?;
    let shell = Shell::build(&neighbors)?;
    let (aligned, alignment) = align(shell.molecule(), ideal)?;
    debug!(
        ave_bond = shell.ave_bond(),
        residual = alignment.residual,
        "shell aligned"
    );

    let mut modes: Vec<ModeAmplitude> = project(&aligned, ideal, basis)?
        .into_iter()
        .skip(TRIVIAL_IRREPS)
        .collect();

    // The center is guaranteed in range after neighbor selection.
    let center_position = structure
        .site(center)
        .ok_or(AnalysisError::SiteIndex {
            index: center,
            sites: structure.sites().len(),
        })?
        .position;
    modes.push(ModeAmplitude {
        label: CENTRE_MODE_LABEL.to_string(),
        amplitude: central_displacement(
            center_position,
            shell.origin(),
            shell.ave_bond(),
            &alignment.rotation,
        ),
    });

    Ok(DistortionAmplitudes { modes })
}

/// [`analyze`] specialized to the octahedral shell and its built-in basis.
pub fn analyze_octahedron(
    structure: &Structure,
    center: usize,
    basis: &BasisTable,
    finder: &dyn NeighborFinder,
) -> Result<DistortionAmplitudes, AnalysisError> {
    analyze(structure, center, basis, &Molecule::ideal_octahedron(), finder)
}
