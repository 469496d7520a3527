use super::lattice::Lattice;
use nalgebra::{Point3, Vector3};

/// One atomic site of a periodic structure.
///
/// The species label is carried for I/O and reporting only; the geometry
/// pipeline treats every site as a bare position.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Species label, e.g. an element symbol.
    pub species: String,
    /// Cartesian position within the cell.
    pub position: Point3<f64>,
}

impl Site {
    /// Creates a site from a species label and a Cartesian position.
    pub fn new(species: impl Into<String>, position: Point3<f64>) -> Self {
        Self {
            species: species.into(),
            position,
        }
    }
}

/// A periodic arrangement of atomic sites.
///
/// Immutable for the purposes of the analysis pipeline; a shared reference
/// can safely serve concurrent analyses of different center atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    lattice: Lattice,
    sites: Vec<Site>,
}

impl Structure {
    /// Creates a structure from a lattice and Cartesian sites.
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self { lattice, sites }
    }

    /// Creates a structure from fractional coordinates.
    pub fn from_fractional(
        lattice: Lattice,
        sites: impl IntoIterator<Item = (String, Vector3<f64>)>,
    ) -> Self {
        let sites = sites
            .into_iter()
            .map(|(species, frac)| Site::new(species, Point3::from(lattice.cartesian(&frac))))
            .collect();
        Self { lattice, sites }
    }

    /// The periodic cell.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// All sites, in input order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Retrieves a site by index.
    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }
}
