use nalgebra::{Point3, Vector3};

/// Canonical vertex directions of the ideal octahedron.
///
/// The order (−x, −y, −z, +z, +y, +x) is load-bearing: it defines the
/// correspondence target for the alignment engine and must match the vertex
/// ordering assumed by the symmetry-basis vectors.
pub const OCTAHEDRON_VERTICES: [[f64; 3]; 6] = [
    [-1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
];

/// A dimensionless local point cloud: the center atom at index 0, followed
/// by the points of its coordination shell.
///
/// Point 0 sits at the local origin by construction. Points are bare
/// positions; species plays no role in the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    points: Vec<Point3<f64>>,
}

impl Molecule {
    /// Builds a molecule from shell points, placing the center at the origin.
    pub fn from_shell_points(shell: impl IntoIterator<Item = Point3<f64>>) -> Self {
        let mut points = vec![Point3::origin()];
        points.extend(shell);
        Self { points }
    }

    /// The ideal reference molecule for a caller-supplied vertex set.
    pub fn ideal(vertices: &[Vector3<f64>]) -> Self {
        Self::from_shell_points(vertices.iter().map(|v| Point3::from(*v)))
    }

    /// The unit octahedron in canonical vertex order.
    pub fn ideal_octahedron() -> Self {
        Self::ideal(&OCTAHEDRON_VERTICES.map(Vector3::from))
    }

    /// All points, center first.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// The shell points, excluding the center.
    pub fn shell(&self) -> &[Point3<f64>] {
        &self.points[1..]
    }

    /// The coordination number (number of shell points).
    pub fn coordination(&self) -> usize {
        self.points.len() - 1
    }
}
