use nalgebra::DMatrix;

/// Solves the square minimum-cost assignment problem.
///
/// Returns `result` such that row `i` is matched to column `result[i]` and
/// the total cost `sum(cost[(i, result[i])])` is minimal. Runs the
/// Kuhn-Munkres algorithm with row/column potentials in O(n^3).
///
/// Ties between equal-cost assignments resolve to the first candidate in
/// scan order, so the output is deterministic for a given matrix.
pub fn minimum_cost_assignment(cost: &DMatrix<f64>) -> Vec<usize> {
    let n = cost.nrows();
    debug_assert_eq!(n, cost.ncols(), "cost matrix must be square");
    if n == 0 {
        return Vec::new();
    }

    // Potentials and matching use 1-based indexing; slot 0 is the virtual
    // column that each augmenting search starts from.
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    let mut matched_row = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        matched_row[0] = row;
        let mut j0 = 0usize;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = matched_row[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[(i0 - 1, j - 1)] - u[i0] - v[j];
                if reduced < min_slack[j] {
                    min_slack[j] = reduced;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[matched_row[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            j0 = j1;
            if matched_row[j0] == 0 {
                break;
            }
        }

        // Walk the augmenting path back, flipping the matching.
        loop {
            let j1 = way[j0];
            matched_row[j0] = matched_row[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut result = vec![0usize; n];
    for j in 1..=n {
        result[matched_row[j] - 1] = j - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_cost(cost: &DMatrix<f64>, assignment: &[usize]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .map(|(row, &col)| cost[(row, col)])
            .sum()
    }

    #[test]
    fn empty_matrix_yields_empty_assignment() {
        let cost = DMatrix::<f64>::zeros(0, 0);
        assert!(minimum_cost_assignment(&cost).is_empty());
    }

    #[test]
    fn picks_the_diagonal_when_it_is_cheapest() {
        let cost = DMatrix::from_row_slice(
            3,
            3,
            &[
                0.0, 5.0, 5.0, //
                5.0, 0.0, 5.0, //
                5.0, 5.0, 0.0,
            ],
        );
        assert_eq!(minimum_cost_assignment(&cost), vec![0, 1, 2]);
    }

    #[test]
    fn solves_a_matrix_with_a_nontrivial_optimum() {
        let cost = DMatrix::from_row_slice(
            3,
            3,
            &[
                4.0, 1.0, 3.0, //
                2.0, 0.0, 5.0, //
                3.0, 2.0, 2.0,
            ],
        );
        let assignment = minimum_cost_assignment(&cost);
        // Optimal total is 1 + 2 + 2 = 5.
        assert_eq!(assignment, vec![1, 0, 2]);
        assert_eq!(total_cost(&cost, &assignment), 5.0);
    }

    #[test]
    fn beats_the_greedy_row_minimum() {
        // Greedy on rows takes (0,0) for 1.0 and is forced into 10.0.
        let cost = DMatrix::from_row_slice(
            2,
            2,
            &[
                1.0, 2.0, //
                1.5, 10.0,
            ],
        );
        let assignment = minimum_cost_assignment(&cost);
        assert_eq!(assignment, vec![1, 0]);
        assert_eq!(total_cost(&cost, &assignment), 3.5);
    }

    #[test]
    fn assignment_is_a_permutation() {
        let cost = DMatrix::from_fn(6, 6, |i, j| ((i * 7 + j * 13) % 5) as f64);
        let mut assignment = minimum_cost_assignment(&cost);
        assignment.sort_unstable();
        assert_eq!(assignment, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn tied_costs_resolve_deterministically() {
        let cost = DMatrix::from_element(4, 4, 1.0);
        let first = minimum_cost_assignment(&cost);
        let second = minimum_cost_assignment(&cost);
        assert_eq!(first, second);
    }
}
