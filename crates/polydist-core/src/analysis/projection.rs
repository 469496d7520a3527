use crate::analysis::error::AnalysisError;
use crate::core::io::basis::BasisTable;
use crate::core::models::molecule::Molecule;
use nalgebra::{Matrix3, Point3, Vector3};

/// The amplitude of one symmetry mode of the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeAmplitude {
    pub label: String,
    pub amplitude: f64,
}

/// Projects the displacement of an aligned shell onto a symmetry basis.
///
/// The displacement is the flattened per-vertex difference between the
/// aligned and ideal shells (the center is excluded; it is pinned to the
/// origin on both sides). Each irrep's amplitude is the Euclidean norm of
/// the projections onto its basis vectors, so it is invariant under any
/// orthonormal choice of partner functions within the irrep.
pub fn project(
    aligned: &Molecule,
    ideal: &Molecule,
    basis: &BasisTable,
) -> Result<Vec<ModeAmplitude>, AnalysisError> {
    let displacement: Vec<f64> = aligned
        .shell()
        .iter()
        .zip(ideal.shell())
        .flat_map(|(a, b)| {
            let d = a - b;
            [d.x, d.y, d.z]
        })
        .collect();
    if basis.dimension() != displacement.len() {
        return Err(AnalysisError::BasisDimension {
            expected: basis.dimension(),
            found: displacement.len(),
        });
    }

    Ok(basis
        .irreps()
        .iter()
        .map(|irrep| {
            let squared: f64 = irrep
                .vectors
                .iter()
                .map(|vector| {
                    vector
                        .iter()
                        .zip(&displacement)
                        .map(|(b, d)| b * d)
                        .sum::<f64>()
                        .powi(2)
                })
                .sum();
            ModeAmplitude {
                label: irrep.label.clone(),
                amplitude: squared.sqrt(),
            }
        })
        .collect())
}

/// Dimensionless displacement of the central atom off the shell centroid,
/// expressed in the aligned frame.
pub fn central_displacement(
    center: Point3<f64>,
    origin: Point3<f64>,
    ave_bond: f64,
    rotation: &Matrix3<f64>,
) -> f64 {
    let local: Vector3<f64> = (center - origin) / ave_bond;
    (rotation * local).norm()
}
