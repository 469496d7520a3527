use crate::analysis::error::AnalysisError;
use crate::analysis::neighbors::NeighborCandidate;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;

/// Average bond lengths below this are treated as a degenerate shell.
pub const MIN_AVE_BOND: f64 = 1e-12;

/// A coordination shell normalized into a dimensionless molecule.
///
/// The local origin is the centroid of the shell points (not the central
/// atom), and every coordinate is divided by the mean center-to-vertex
/// distance, so shells of any size project onto the same basis.
#[derive(Debug, Clone)]
pub struct Shell {
    molecule: Molecule,
    origin: Point3<f64>,
    ave_bond: f64,
}

impl Shell {
    /// Normalizes a selected set of neighbors into a shell.
    pub fn build(neighbors: &[NeighborCandidate]) -> Result<Self, AnalysisError> {
        let count = neighbors.len() as f64;
        let origin = Point3::from(
            neighbors
                .iter()
                .map(|n| n.position.coords)
                .sum::<nalgebra::Vector3<f64>>()
                / count,
        );
        let ave_bond = neighbors
            .iter()
            .map(|n| (n.position - origin).norm())
            .sum::<f64>()
            / count;
        // NaN also fails this comparison.
        if !(ave_bond > MIN_AVE_BOND) {
            return Err(AnalysisError::DegenerateShell {
                ave_bond,
                min: MIN_AVE_BOND,
            });
        }

        let molecule = Molecule::from_shell_points(
            neighbors
                .iter()
                .map(|n| Point3::from((n.position - origin) / ave_bond)),
        );
        Ok(Self {
            molecule,
            origin,
            ave_bond,
        })
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    /// The shell centroid in the structure's Cartesian frame.
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// The mean centroid-to-vertex distance, in the structure's length unit.
    pub fn ave_bond(&self) -> f64 {
        self.ave_bond
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn candidate(position: Point3<f64>) -> NeighborCandidate {
        let distance = position.coords.norm();
        NeighborCandidate {
            site_index: 0,
            image: [0, 0, 0],
            position,
            distance,
            weight: 1.0,
        }
    }

    #[test]
    fn normalizes_a_symmetric_shell_to_unit_vertices() {
        let neighbors: Vec<_> = [
            [-2.0, 0.0, 0.0],
            [0.0, -2.0, 0.0],
            [0.0, 0.0, -2.0],
            [0.0, 0.0, 2.0],
            [0.0, 2.0, 0.0],
            [2.0, 0.0, 0.0],
        ]
        .into_iter()
        .map(|p| candidate(Point3::from(p)))
        .collect();

        let shell = Shell::build(&neighbors).unwrap();

        assert_relative_eq!(shell.origin(), Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(shell.ave_bond(), 2.0, epsilon = 1e-12);
        for vertex in shell.molecule().shell() {
            assert_relative_eq!(vertex.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn origin_is_the_shell_centroid_not_the_central_atom() {
        // A shell rigidly shifted by (1, 0, 0) keeps its own centroid.
        let neighbors: Vec<_> = [
            [-1.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [1.0, 2.0, 0.0],
            [1.0, -2.0, 0.0],
        ]
        .into_iter()
        .map(|p| candidate(Point3::from(p)))
        .collect();

        let shell = Shell::build(&neighbors).unwrap();
        assert_relative_eq!(shell.origin(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(shell.ave_bond(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_points_report_a_degenerate_shell() {
        let neighbors = vec![
            candidate(Point3::new(1.0, 1.0, 1.0)),
            candidate(Point3::new(1.0, 1.0, 1.0)),
        ];

        let err = Shell::build(&neighbors).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateShell { .. }));
    }
}
