use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// One irreducible-representation group of symmetry-adapted basis vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Irrep {
    /// The irrep label, e.g. `"Eg"`.
    pub label: String,
    /// The basis vectors spanning this irrep's subspace of the flattened
    /// shell-displacement space.
    pub vectors: Vec<Vec<f64>>,
}

/// An ordered table of symmetry-adapted basis vectors, grouped by irrep.
///
/// Group order is the source order and is semantically meaningful: the
/// leading groups are the trivial rigid-body modes (dropped from the
/// report), the remainder the physical distortion modes. The table is
/// loaded once and shared read-only for the duration of an analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisTable {
    irreps: Vec<Irrep>,
}

/// Represents errors that can occur while loading a basis table.
#[derive(Debug, Error)]
pub enum BasisLoadError {
    /// The basis file could not be read from disk.
    #[error("File I/O error for '{path}': {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The basis file content is not valid JSON of the expected shape.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// The table contains no irrep groups at all.
    #[error("Basis table contains no irrep groups")]
    Empty,
    /// A basis vector's length disagrees with the rest of the table.
    #[error("Irrep '{label}' has a basis vector of length {found}, expected {expected}")]
    RaggedVector {
        label: String,
        expected: usize,
        found: usize,
    },
}

impl BasisTable {
    /// Creates a table from irrep groups, validating that every basis vector
    /// spans the same displacement space.
    pub fn new(irreps: Vec<Irrep>) -> Result<Self, BasisLoadError> {
        let expected = irreps
            .iter()
            .flat_map(|irrep| irrep.vectors.first())
            .map(Vec::len)
            .next()
            .ok_or(BasisLoadError::Empty)?;
        if expected == 0 {
            return Err(BasisLoadError::Empty);
        }
        for irrep in &irreps {
            for vector in &irrep.vectors {
                if vector.len() != expected {
                    return Err(BasisLoadError::RaggedVector {
                        label: irrep.label.clone(),
                        expected,
                        found: vector.len(),
                    });
                }
            }
        }
        Ok(Self { irreps })
    }

    /// The irrep groups, in table order.
    pub fn irreps(&self) -> &[Irrep] {
        &self.irreps
    }

    /// The dimension of the flattened displacement space the table spans.
    pub fn dimension(&self) -> usize {
        self.irreps
            .iter()
            .flat_map(|irrep| irrep.vectors.first())
            .map(Vec::len)
            .next()
            .unwrap_or(0)
    }

    /// Reads a table from a JSON mapping of irrep label to basis vectors.
    ///
    /// The key order of the JSON object is preserved and becomes the table
    /// order.
    pub fn from_reader(reader: impl Read) -> Result<Self, BasisLoadError> {
        let groups: OrderedGroups = serde_json::from_reader(reader)?;
        Self::new(groups.0)
    }

    /// Reads a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BasisLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BasisLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// The canonical octahedron basis.
    ///
    /// Seven irrep groups spanning the 18-dimensional shell-displacement
    /// space of the unit octahedron, orthonormal, with the trivial groups
    /// (A1g breathing, T1g rigid rotations, acoustic T1u translations)
    /// first. Vertex order matches
    /// [`OCTAHEDRON_VERTICES`](crate::core::models::molecule::OCTAHEDRON_VERTICES).
    pub fn octahedron() -> Self {
        let s = 6f64.sqrt().recip();
        let h = 0.5;
        let q = 12f64.sqrt().recip();
        let t = 2.0 * q;
        let group = |label: &str, vectors: &[[f64; 18]]| Irrep {
            label: label.to_string(),
            vectors: vectors.iter().map(|v| v.to_vec()).collect(),
        };
        #[rustfmt::skip]
        let irreps = vec![
            group("A1g", &[
                [-s, 0.0, 0.0,  0.0, -s, 0.0,  0.0, 0.0, -s,  0.0, 0.0, s,  0.0, s, 0.0,  s, 0.0, 0.0],
            ]),
            group("T1g", &[
                [0.0, 0.0, 0.0,  0.0, 0.0, -h,  0.0, h, 0.0,  0.0, -h, 0.0,  0.0, 0.0, h,  0.0, 0.0, 0.0],
                [0.0, 0.0, h,  0.0, 0.0, 0.0,  -h, 0.0, 0.0,  h, 0.0, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, -h],
                [0.0, -h, 0.0,  h, 0.0, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, 0.0,  -h, 0.0, 0.0,  0.0, h, 0.0],
            ]),
            group("T1u(acoustic)", &[
                [s, 0.0, 0.0,  s, 0.0, 0.0,  s, 0.0, 0.0,  s, 0.0, 0.0,  s, 0.0, 0.0,  s, 0.0, 0.0],
                [0.0, s, 0.0,  0.0, s, 0.0,  0.0, s, 0.0,  0.0, s, 0.0,  0.0, s, 0.0,  0.0, s, 0.0],
                [0.0, 0.0, s,  0.0, 0.0, s,  0.0, 0.0, s,  0.0, 0.0, s,  0.0, 0.0, s,  0.0, 0.0, s],
            ]),
            group("Eg", &[
                [q, 0.0, 0.0,  0.0, q, 0.0,  0.0, 0.0, -t,  0.0, 0.0, t,  0.0, -q, 0.0,  -q, 0.0, 0.0],
                [-h, 0.0, 0.0,  0.0, h, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, 0.0,  0.0, -h, 0.0,  h, 0.0, 0.0],
            ]),
            group("T2g", &[
                [0.0, -h, 0.0,  -h, 0.0, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, 0.0,  h, 0.0, 0.0,  0.0, h, 0.0],
                [0.0, 0.0, 0.0,  0.0, 0.0, -h,  0.0, -h, 0.0,  0.0, h, 0.0,  0.0, 0.0, h,  0.0, 0.0, 0.0],
                [0.0, 0.0, -h,  0.0, 0.0, 0.0,  -h, 0.0, 0.0,  h, 0.0, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, h],
            ]),
            group("T1u", &[
                [t, 0.0, 0.0,  -q, 0.0, 0.0,  -q, 0.0, 0.0,  -q, 0.0, 0.0,  -q, 0.0, 0.0,  t, 0.0, 0.0],
                [0.0, -q, 0.0,  0.0, t, 0.0,  0.0, -q, 0.0,  0.0, -q, 0.0,  0.0, t, 0.0,  0.0, -q, 0.0],
                [0.0, 0.0, -q,  0.0, 0.0, -q,  0.0, 0.0, t,  0.0, 0.0, t,  0.0, 0.0, -q,  0.0, 0.0, -q],
            ]),
            group("T2u", &[
                [0.0, 0.0, 0.0,  -h, 0.0, 0.0,  h, 0.0, 0.0,  h, 0.0, 0.0,  -h, 0.0, 0.0,  0.0, 0.0, 0.0],
                [0.0, h, 0.0,  0.0, 0.0, 0.0,  0.0, -h, 0.0,  0.0, -h, 0.0,  0.0, 0.0, 0.0,  0.0, h, 0.0],
                [0.0, 0.0, -h,  0.0, 0.0, h,  0.0, 0.0, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, h,  0.0, 0.0, -h],
            ]),
        ];
        Self { irreps }
    }
}

/// JSON object wrapper that keeps the key order of the source document.
struct OrderedGroups(Vec<Irrep>);

impl<'de> Deserialize<'de> for OrderedGroups {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = OrderedGroups;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of irrep labels to lists of basis vectors")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut irreps = Vec::new();
                while let Some((label, vectors)) = map.next_entry::<String, Vec<Vec<f64>>>()? {
                    irreps.push(Irrep { label, vectors });
                }
                Ok(OrderedGroups(irreps))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}
