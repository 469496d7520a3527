use crate::analysis::error::AnalysisError;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use tracing::debug;

/// Default neighbor-search cutoff radius in angstroms.
pub const DEFAULT_CUTOFF: f64 = 6.5;

/// A candidate neighbor of a central site, possibly in a periodic image.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborCandidate {
    /// Index of the neighbor's site in the structure.
    pub site_index: usize,
    /// Lattice image the neighbor was found in.
    pub image: [i32; 3],
    /// Cartesian position of the neighbor, image translation applied.
    pub position: Point3<f64>,
    /// Distance to the central site.
    pub distance: f64,
    /// Proximity weight, 1 at the center falling linearly to 0 at the cutoff.
    pub weight: f64,
}

/// A strategy for enumerating the periodic neighbors of a site.
pub trait NeighborFinder {
    /// Returns every neighbor of `center` this finder considers, in no
    /// particular order. The central site's own `[0, 0, 0]` image is never
    /// included.
    fn candidates(&self, structure: &Structure, center: usize) -> Vec<NeighborCandidate>;
}

/// Finds all periodic neighbors within a fixed cutoff radius.
///
/// The image search range along each lattice direction is derived from the
/// spacing between the corresponding lattice planes, so skewed and thin
/// cells are covered without scanning an excessive block of images.
#[derive(Debug, Clone)]
pub struct CutoffNeighborFinder {
    cutoff: f64,
}

impl Default for CutoffNeighborFinder {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl CutoffNeighborFinder {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl NeighborFinder for CutoffNeighborFinder {
    fn candidates(&self, structure: &Structure, center: usize) -> Vec<NeighborCandidate> {
        let lattice = structure.lattice();
        let Some(site) = structure.site(center) else {
            return Vec::new();
        };
        let origin = site.position;

        let range = match lattice.plane_spacings() {
            Some(spacings) => spacings.map(|d| (self.cutoff / d).ceil() as i32),
            // Degenerate cell, fall back to the home image only.
            None => [0, 0, 0],
        };

        let mut found = Vec::new();
        for (site_index, neighbor) in structure.sites().iter().enumerate() {
            for a in -range[0]..=range[0] {
                for b in -range[1]..=range[1] {
                    for c in -range[2]..=range[2] {
                        let image = [a, b, c];
                        if site_index == center && image == [0, 0, 0] {
                            continue;
                        }
                        let position = neighbor.position + lattice.image_translation(image);
                        let distance = (position - origin).norm();
                        if distance > self.cutoff {
                            continue;
                        }
                        found.push(NeighborCandidate {
                            site_index,
                            image,
                            position,
                            distance,
                            weight: 1.0 - distance / self.cutoff,
                        });
                    }
                }
            }
        }
        found
    }
}

/// Selects the `k` strongest neighbors of a site.
///
/// Candidates are ranked by descending weight, with ties broken by
/// ascending distance, then site index, then image, so the selection is
/// fully deterministic.
pub fn select_neighbors(
    structure: &Structure,
    center: usize,
    k: usize,
    finder: &dyn NeighborFinder,
) -> Result<Vec<NeighborCandidate>, AnalysisError> {
    if structure.site(center).is_none() {
        return Err(AnalysisError::SiteIndex {
            index: center,
            sites: structure.sites().len(),
        });
    }

    let mut candidates = finder.candidates(structure, center);
    if candidates.len() < k {
        return Err(AnalysisError::Coordination {
            required: k,
            found: candidates.len(),
        });
    }

    candidates.sort_by(|lhs, rhs| {
        rhs.weight
            .total_cmp(&lhs.weight)
            .then_with(|| lhs.distance.total_cmp(&rhs.distance))
            .then_with(|| lhs.site_index.cmp(&rhs.site_index))
            .then_with(|| lhs.image.cmp(&rhs.image))
    });
    candidates.truncate(k);

    debug!(
        center,
        coordination = k,
        max_distance = candidates.last().map(|c| c.distance),
        "selected coordination shell"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::lattice::Lattice;
    use crate::core::models::structure::Structure;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn perovskite(a: f64) -> Structure {
        Structure::from_fractional(
            Lattice::cubic(a),
            [
                ("Ti".to_string(), Vector3::new(0.0, 0.0, 0.0)),
                ("Sr".to_string(), Vector3::new(0.5, 0.5, 0.5)),
                ("O".to_string(), Vector3::new(0.5, 0.0, 0.0)),
                ("O".to_string(), Vector3::new(0.0, 0.5, 0.0)),
                ("O".to_string(), Vector3::new(0.0, 0.0, 0.5)),
            ],
        )
    }

    #[test]
    fn finds_the_octahedral_oxygen_shell_across_images() {
        let structure = perovskite(4.0);
        let finder = CutoffNeighborFinder::new(3.0);

        let shell = select_neighbors(&structure, 0, 6, &finder).unwrap();

        assert_eq!(shell.len(), 6);
        for neighbor in &shell {
            assert!(neighbor.site_index >= 2, "expected only oxygen sites");
            assert_relative_eq!(neighbor.distance, 2.0, epsilon = 1e-12);
            assert_relative_eq!(neighbor.weight, 1.0 - 2.0 / 3.0, epsilon = 1e-12);
        }
        // Half of the shell lives in negative periodic images.
        assert_eq!(
            shell.iter().filter(|n| n.image != [0, 0, 0]).count(),
            3
        );
    }

    #[test]
    fn closer_shells_outrank_farther_ones() {
        let structure = perovskite(4.0);
        let finder = CutoffNeighborFinder::new(6.5);

        // 6 O at 2.0, then 8 Sr at 2*sqrt(3) ~ 3.46.
        let shell = select_neighbors(&structure, 0, 14, &finder).unwrap();

        for neighbor in &shell[..6] {
            assert_relative_eq!(neighbor.distance, 2.0, epsilon = 1e-12);
        }
        for neighbor in &shell[6..] {
            assert_eq!(neighbor.site_index, 1);
            assert_relative_eq!(neighbor.distance, 12.0f64.sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let structure = perovskite(4.0);
        let finder = CutoffNeighborFinder::default();

        let first = select_neighbors(&structure, 0, 6, &finder).unwrap();
        let second = select_neighbors(&structure, 0, 6, &finder).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn short_cutoff_reports_coordination_shortfall() {
        let structure = perovskite(4.0);
        let finder = CutoffNeighborFinder::new(1.0);

        let err = select_neighbors(&structure, 0, 6, &finder).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Coordination {
                required: 6,
                found: 0,
            }
        ));
    }

    #[test]
    fn out_of_range_center_is_rejected() {
        let structure = perovskite(4.0);
        let finder = CutoffNeighborFinder::default();

        let err = select_neighbors(&structure, 9, 6, &finder).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::SiteIndex { index: 9, sites: 5 }
        ));
    }
}
