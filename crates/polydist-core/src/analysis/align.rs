use crate::analysis::assignment::minimum_cost_assignment;
use crate::analysis::error::AnalysisError;
use crate::core::models::molecule::Molecule;
use nalgebra::{DMatrix, Matrix3, Point3, Vector3};
use tracing::trace;

/// Upper bound on permutation/rotation refinement rounds per seed.
pub const MAX_REFINE_ITERATIONS: usize = 16;

/// Cross products below this norm mark a shell-vector pair as collinear.
pub const COLLINEAR_EPS: f64 = 1e-8;

/// The result of fitting an observed molecule onto an ideal reference.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// `permutation[j]` is the observed shell index matched to ideal vertex `j`.
    pub permutation: Vec<usize>,
    /// Proper rotation (determinant +1) taking observed into ideal frame.
    pub rotation: Matrix3<f64>,
    /// Residual centroid offset after rotation.
    pub translation: Vector3<f64>,
    /// Sum of squared vertex distances at the optimum.
    pub residual: f64,
}

/// Least-squares rotation taking `from` onto `to` under a fixed
/// correspondence (`from[i]` pairs with `to[i]`).
///
/// Both clouds are centered on their centroids first. The result is always
/// a proper rotation: when the best orthogonal fit is a reflection, the
/// singular direction least constrained by the data is flipped.
pub fn kabsch_rotation(
    from: &[Point3<f64>],
    to: &[Point3<f64>],
) -> Result<Matrix3<f64>, AnalysisError> {
    let count = from.len() as f64;
    let from_centroid = from.iter().map(|p| p.coords).sum::<Vector3<f64>>() / count;
    let to_centroid = to.iter().map(|p| p.coords).sum::<Vector3<f64>>() / count;

    let mut h = Matrix3::zeros();
    for (p, q) in from.iter().zip(to) {
        h += (p.coords - from_centroid) * (q.coords - to_centroid).transpose();
    }

    let svd = h.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(AnalysisError::Alignment(
            "SVD of the cross-covariance matrix did not converge".to_string(),
        ));
    };

    let mut v = v_t.transpose();
    if (v * u.transpose()).determinant() < 0.0 {
        // nalgebra does not order singular values; flip the weakest one.
        let weakest = svd.singular_values.imin();
        let mut column = v.column_mut(weakest);
        column *= -1.0;
    }
    Ok(v * u.transpose())
}

/// Rotation seeds derived from the observed shell geometry.
///
/// Each non-collinear ordered pair of shell vectors defines a right-handed
/// frame that is rotated onto the Cartesian axes. Together with the
/// identity these cover every coarse orientation the refinement loop may
/// need to escape a poor local optimum.
fn seed_rotations(shell: &[Vector3<f64>]) -> Vec<Matrix3<f64>> {
    let mut seeds = vec![Matrix3::identity()];
    for (i, a) in shell.iter().enumerate() {
        for (j, b) in shell.iter().enumerate() {
            if i == j {
                continue;
            }
            let normal = a.cross(b);
            if normal.norm() < COLLINEAR_EPS || a.norm() < COLLINEAR_EPS {
                continue;
            }
            let e1 = a.normalize();
            let e3 = normal.normalize();
            let e2 = e3.cross(&e1);
            seeds.push(Matrix3::from_rows(&[
                e1.transpose(),
                e2.transpose(),
                e3.transpose(),
            ]));
        }
    }
    seeds
}

/// Alternates assignment and rotation refinement from one seed rotation.
fn refine(
    source: &[Point3<f64>],
    target: &[Point3<f64>],
    seed: Matrix3<f64>,
) -> Result<(Vec<usize>, Matrix3<f64>, f64), AnalysisError> {
    let n = source.len();
    let assignment_for = |rotation: &Matrix3<f64>| {
        let cost = DMatrix::from_fn(n, n, |i, j| {
            (rotation * source[i].coords - target[j].coords).norm_squared()
        });
        minimum_cost_assignment(&cost)
    };

    let mut rotation = seed;
    let mut assignment = assignment_for(&rotation);
    for _ in 0..MAX_REFINE_ITERATIONS {
        let reordered: Vec<Point3<f64>> =
            assignment.iter().map(|&j| target[j]).collect();
        rotation = kabsch_rotation(source, &reordered)?;
        let next = assignment_for(&rotation);
        if next == assignment {
            break;
        }
        assignment = next;
    }

    let residual = assignment
        .iter()
        .enumerate()
        .map(|(i, &j)| (rotation * source[i].coords - target[j].coords).norm_squared())
        .sum();
    Ok((assignment, rotation, residual))
}

/// Fits `observed` onto `ideal`, optimizing over vertex correspondence and
/// rigid rotation jointly.
///
/// Every seed orientation is refined to convergence and the lowest-residual
/// fit wins; ties keep the first seed found, so the result is deterministic.
/// Returns the observed molecule rotated and reordered into the ideal
/// vertex order, along with the fit parameters.
pub fn align(
    observed: &Molecule,
    ideal: &Molecule,
) -> Result<(Molecule, Alignment), AnalysisError> {
    if observed.coordination() != ideal.coordination() {
        return Err(AnalysisError::Coordination {
            required: ideal.coordination(),
            found: observed.coordination(),
        });
    }

    let source = observed.shell();
    let target = ideal.shell();

    let mut best: Option<(Vec<usize>, Matrix3<f64>, f64)> = None;
    let shell_vectors: Vec<Vector3<f64>> = source.iter().map(|p| p.coords).collect();
    for seed in seed_rotations(&shell_vectors) {
        let candidate = refine(source, target, seed)?;
        let better = match &best {
            Some((_, _, residual)) => candidate.2 < *residual,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    let Some((assignment, rotation, residual)) = best else {
        return Err(AnalysisError::Alignment(
            "no usable seed orientation for the shell".to_string(),
        ));
    };
    trace!(residual, "alignment converged");

    // assignment maps observed -> ideal; invert it to list the observed
    // vertex sitting at each ideal position.
    let mut permutation = vec![0usize; assignment.len()];
    for (observed_index, &ideal_index) in assignment.iter().enumerate() {
        permutation[ideal_index] = observed_index;
    }

    let aligned = Molecule::from_shell_points(
        permutation
            .iter()
            .map(|&i| Point3::from(rotation * source[i].coords)),
    );

    let source_centroid =
        source.iter().map(|p| p.coords).sum::<Vector3<f64>>() / source.len() as f64;
    let target_centroid =
        target.iter().map(|p| p.coords).sum::<Vector3<f64>>() / target.len() as f64;
    let translation = target_centroid - rotation * source_centroid;

    Ok((
        aligned,
        Alignment {
            permutation,
            rotation,
            translation,
            residual,
        },
    ))
}
