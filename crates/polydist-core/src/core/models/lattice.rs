use nalgebra::{Matrix3, Vector3};

/// A periodic cell described by three lattice vectors.
///
/// The vectors are stored as the rows of a 3×3 matrix, following the
/// crystallographic row convention used by VASP-style structure files.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    matrix: Matrix3<f64>,
}

impl Lattice {
    /// Creates a lattice from its three lattice vectors.
    pub fn from_rows(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]),
        }
    }

    /// Creates a cubic lattice with edge length `a`.
    pub fn cubic(a: f64) -> Self {
        Self {
            matrix: Matrix3::from_diagonal_element(a),
        }
    }

    /// The row matrix of lattice vectors.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The first lattice vector.
    pub fn a(&self) -> Vector3<f64> {
        self.matrix.row(0).transpose()
    }

    /// The second lattice vector.
    pub fn b(&self) -> Vector3<f64> {
        self.matrix.row(1).transpose()
    }

    /// The third lattice vector.
    pub fn c(&self) -> Vector3<f64> {
        self.matrix.row(2).transpose()
    }

    /// Converts a fractional coordinate triple to a Cartesian vector.
    pub fn cartesian(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transpose() * fractional
    }

    /// Converts an integer periodic-image offset to a Cartesian translation.
    pub fn image_translation(&self, image: [i32; 3]) -> Vector3<f64> {
        self.cartesian(&Vector3::new(
            f64::from(image[0]),
            f64::from(image[1]),
            f64::from(image[2]),
        ))
    }

    /// The cell volume.
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Uniformly rescales the cell by a linear factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            matrix: self.matrix * factor,
        }
    }

    /// Perpendicular spacings between the three pairs of opposite cell faces.
    ///
    /// Spacing `i` bounds how many periodic images along lattice vector `i`
    /// are needed to cover a given Cartesian radius. Returns `None` for a
    /// singular cell.
    pub fn plane_spacings(&self) -> Option<[f64; 3]> {
        let volume = self.volume();
        if volume < 1e-12 {
            return None;
        }
        let (a, b, c) = (self.a(), self.b(), self.c());
        Some([
            volume / b.cross(&c).norm(),
            volume / c.cross(&a).norm(),
            volume / a.cross(&b).norm(),
        ])
    }
}
