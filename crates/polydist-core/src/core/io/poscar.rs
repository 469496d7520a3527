use crate::core::models::lattice::Lattice;
use crate::core::models::structure::{Site, Structure};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Represents errors that can occur while reading a VASP-style structure file.
#[derive(Debug, Error)]
pub enum PoscarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PoscarParseErrorKind,
    },
    #[error("Unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),
}

#[derive(Debug, Error)]
pub enum PoscarParseErrorKind {
    #[error("Invalid float (value: '{0}')")]
    InvalidFloat(String),
    #[error("Invalid integer (value: '{0}')")]
    InvalidInt(String),
    #[error("Expected at least {expected} whitespace-separated fields, found {found}")]
    NotEnoughFields { expected: usize, found: usize },
    #[error("Scale factor must be non-zero")]
    ZeroScale,
    #[error("Cell is singular, cannot place atoms")]
    SingularCell,
}

/// Reads a structure from POSCAR-formatted text.
///
/// Supported layout: comment line, universal scale factor (a negative value
/// is interpreted as the target cell volume, as in VASP), three lattice
/// rows, an optional element-symbol line, per-element counts, an optional
/// selective-dynamics line, and `Direct` or `Cartesian` coordinates.
pub fn read_from(reader: &mut impl BufRead) -> Result<Structure, PoscarError> {
    let mut lines = Lines::new(reader);

    lines.next_line("comment line")?;

    let scale_line = lines.next_line("scale factor")?;
    let raw_scale = parse_floats(&scale_line, 1, lines.number)?[0];
    if raw_scale == 0.0 {
        return Err(PoscarError::Parse {
            line: lines.number,
            kind: PoscarParseErrorKind::ZeroScale,
        });
    }

    let mut rows = [Vector3::zeros(); 3];
    for row in &mut rows {
        let line = lines.next_line("lattice vector")?;
        let fields = parse_floats(&line, 3, lines.number)?;
        *row = Vector3::new(fields[0], fields[1], fields[2]);
    }
    let unscaled = Lattice::from_rows(rows[0], rows[1], rows[2]);
    // A negative "scale" is the desired cell volume; derive the linear factor.
    let scale = if raw_scale > 0.0 {
        raw_scale
    } else {
        let volume = unscaled.volume();
        if volume < 1e-12 {
            return Err(PoscarError::Parse {
                line: lines.number,
                kind: PoscarParseErrorKind::SingularCell,
            });
        }
        (-raw_scale / volume).cbrt()
    };
    let lattice = unscaled.scaled(scale);

    let first = lines.next_line("element symbols or counts")?;
    let starts_alphabetic = first
        .split_whitespace()
        .next()
        .is_some_and(|token| token.chars().next().is_some_and(char::is_alphabetic));
    let (symbols, counts_line, counts_line_number) = if starts_alphabetic {
        let symbols: Vec<String> = first.split_whitespace().map(str::to_string).collect();
        let counts = lines.next_line("atom counts")?;
        (symbols, counts, lines.number)
    } else {
        (Vec::new(), first, lines.number)
    };
    let counts = parse_counts(&counts_line, counts_line_number)?;

    let mut mode = lines.next_line("coordinate mode")?;
    if mode.trim_start().starts_with(['s', 'S']) {
        // Selective dynamics; the real mode line follows.
        mode = lines.next_line("coordinate mode")?;
    }
    let is_direct = !mode.trim_start().starts_with(['c', 'C', 'k', 'K']);

    let mut sites = Vec::with_capacity(counts.iter().sum());
    for (element, &count) in counts.iter().enumerate() {
        let species = symbols
            .get(element)
            .cloned()
            .unwrap_or_else(|| "X".to_string());
        for _ in 0..count {
            let line = lines.next_line("atom position")?;
            let fields = parse_floats(&line, 3, lines.number)?;
            let triple = Vector3::new(fields[0], fields[1], fields[2]);
            let cartesian = if is_direct {
                lattice.cartesian(&triple)
            } else {
                triple * scale
            };
            sites.push(Site::new(species.clone(), Point3::from(cartesian)));
        }
    }

    Ok(Structure::new(lattice, sites))
}

/// Reads a structure from a POSCAR file on disk.
pub fn read_from_path(path: impl AsRef<Path>) -> Result<Structure, PoscarError> {
    let file = File::open(path)?;
    read_from(&mut BufReader::new(file))
}

struct Lines<'a, R: BufRead> {
    reader: &'a mut R,
    number: usize,
}

impl<'a, R: BufRead> Lines<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self { reader, number: 0 }
    }

    fn next_line(&mut self, what: &'static str) -> Result<String, PoscarError> {
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            return Err(PoscarError::UnexpectedEof(what));
        }
        self.number += 1;
        Ok(buffer)
    }
}

fn parse_floats(line: &str, expected: usize, number: usize) -> Result<Vec<f64>, PoscarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < expected {
        return Err(PoscarError::Parse {
            line: number,
            kind: PoscarParseErrorKind::NotEnoughFields {
                expected,
                found: fields.len(),
            },
        });
    }
    fields[..expected]
        .iter()
        .map(|field| {
            field.parse::<f64>().map_err(|_| PoscarError::Parse {
                line: number,
                kind: PoscarParseErrorKind::InvalidFloat(field.to_string()),
            })
        })
        .collect()
}

fn parse_counts(line: &str, number: usize) -> Result<Vec<usize>, PoscarError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Err(PoscarError::Parse {
            line: number,
            kind: PoscarParseErrorKind::NotEnoughFields {
                expected: 1,
                found: 0,
            },
        });
    }
    fields
        .iter()
        .map(|field| {
            field.parse::<usize>().map_err(|_| PoscarError::Parse {
                line: number,
                kind: PoscarParseErrorKind::InvalidInt(field.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PEROVSKITE: &str = "\
SrTiO3 cubic
1.0
  4.0 0.0 0.0
  0.0 4.0 0.0
  0.0 0.0 4.0
Sr Ti O
1 1 3
Direct
  0.5 0.5 0.5
  0.0 0.0 0.0
  0.5 0.0 0.0
  0.0 0.5 0.0
  0.0 0.0 0.5
";

    #[test]
    fn parses_direct_coordinates_with_symbols() {
        let structure = read_from(&mut PEROVSKITE.as_bytes()).unwrap();

        assert_eq!(structure.sites().len(), 5);
        assert_eq!(structure.site(0).unwrap().species, "Sr");
        assert_eq!(structure.site(1).unwrap().species, "Ti");
        assert_eq!(structure.site(4).unwrap().species, "O");
        assert_relative_eq!(
            structure.site(0).unwrap().position,
            Point3::new(2.0, 2.0, 2.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            structure.site(2).unwrap().position,
            Point3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn parses_cartesian_coordinates_with_scale() {
        let input = "\
comment
2.0
  1.0 0.0 0.0
  0.0 1.0 0.0
  0.0 0.0 1.0
H
1
Cartesian
  0.25 0.5 0.75
";
        let structure = read_from(&mut input.as_bytes()).unwrap();
        assert_relative_eq!(
            structure.lattice().volume(),
            8.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            structure.site(0).unwrap().position,
            Point3::new(0.5, 1.0, 1.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn missing_symbol_line_falls_back_to_placeholder_species() {
        let input = "\
comment
1.0
  2.0 0.0 0.0
  0.0 2.0 0.0
  0.0 0.0 2.0
2
Direct
  0.0 0.0 0.0
  0.5 0.5 0.5
";
        let structure = read_from(&mut input.as_bytes()).unwrap();
        assert_eq!(structure.sites().len(), 2);
        assert_eq!(structure.site(0).unwrap().species, "X");
    }

    #[test]
    fn negative_scale_sets_cell_volume() {
        let input = "\
comment
-64.0
  1.0 0.0 0.0
  0.0 1.0 0.0
  0.0 0.0 1.0
H
1
Direct
  0.5 0.0 0.0
";
        let structure = read_from(&mut input.as_bytes()).unwrap();
        assert_relative_eq!(structure.lattice().volume(), 64.0, epsilon = 1e-9);
        assert_relative_eq!(
            structure.site(0).unwrap().position,
            Point3::new(2.0, 0.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn selective_dynamics_line_is_skipped() {
        let input = "\
comment
1.0
  2.0 0.0 0.0
  0.0 2.0 0.0
  0.0 0.0 2.0
H
1
Selective dynamics
Direct
  0.5 0.5 0.5 T T T
";
        let structure = read_from(&mut input.as_bytes()).unwrap();
        assert_relative_eq!(
            structure.site(0).unwrap().position,
            Point3::new(1.0, 1.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn invalid_lattice_row_reports_line_number() {
        let input = "comment\n1.0\n 1.0 0.0 0.0\n 0.0 oops 0.0\n";
        let err = read_from(&mut input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PoscarError::Parse {
                line: 4,
                kind: PoscarParseErrorKind::InvalidFloat(_),
            }
        ));
    }

    #[test]
    fn truncated_file_reports_eof() {
        let input = "comment\n1.0\n 1.0 0.0 0.0\n";
        let err = read_from(&mut input.as_bytes()).unwrap_err();
        assert!(matches!(err, PoscarError::UnexpectedEof("lattice vector")));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let input = "comment\n0.0\n";
        let err = read_from(&mut input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PoscarError::Parse {
                kind: PoscarParseErrorKind::ZeroScale,
                ..
            }
        ));
    }

    #[test]
    fn reads_from_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("POSCAR");
        std::fs::write(&path, PEROVSKITE).unwrap();

        let structure = read_from_path(&path).unwrap();
        assert_eq!(structure.sites().len(), 5);
    }
}
