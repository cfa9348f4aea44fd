//! Pareto front extraction.
//!
//! Fast non-dominated sorting over [`Fitness`] vectors, used to report the
//! trade-off set of a multi-objective solve. All objectives are
//! **minimized**; failed evaluations are dominated by every valid one.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use super::Fitness;

/// Result of non-dominated sorting.
///
/// `ranks[i]` is the Pareto rank of solution `i`; rank 0 is the front.
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Dominance comparison result.
#[derive(Debug, PartialEq)]
enum Dominance {
    Left,
    Right,
    Neither,
}

fn dominance_cmp(a: &Fitness, b: &Fitness, n: usize) -> Dominance {
    match (a.is_valid(), b.is_valid()) {
        (true, false) => return Dominance::Left,
        (false, true) => return Dominance::Right,
        (false, false) => return Dominance::Neither,
        (true, true) => {}
    }

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;
    for (&va, &vb) in a.as_slice().iter().zip(b.as_slice()).take(n) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Fast non-dominated sorting on the first `objective_count` objectives.
///
/// O(m * n²) for m objectives and n solutions. An empty input yields an
/// empty result.
///
/// # Example
///
/// ```
/// use u_fitsolve::fitness::{pareto::non_dominated_sort, Fitness};
///
/// let f = |v: &[f64]| Fitness::from_slice(v).unwrap();
/// let objectives = vec![f(&[1.0, 5.0]), f(&[3.0, 3.0]), f(&[5.0, 1.0]), f(&[4.0, 4.0])];
///
/// let result = non_dominated_sort(&objectives, 2);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort(objectives: &[Fitness], objective_count: usize) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j], objective_count) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = vec![front_0];
    loop {
        let Some(current) = fronts.last() else {
            break;
        };
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Indices of the rank-0 solutions with a valid fitness.
pub fn pareto_front_indices(objectives: &[Fitness], objective_count: usize) -> Vec<usize> {
    non_dominated_sort(objectives, objective_count)
        .fronts
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .filter(|&i| objectives[i].is_valid())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: &[f64]) -> Fitness {
        Fitness::from_slice(v).unwrap()
    }

    #[test]
    fn test_empty() {
        let result = non_dominated_sort(&[], 2);
        assert!(result.ranks.is_empty());
        assert!(result.fronts.is_empty());
    }

    #[test]
    fn test_single_solution() {
        let result = non_dominated_sort(&[f(&[1.0, 2.0])], 2);
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_clear_dominance() {
        let objs = vec![f(&[1.0, 1.0]), f(&[2.0, 2.0]), f(&[3.0, 3.0])];
        let result = non_dominated_sort(&objs, 2);
        assert_eq!(result.ranks, vec![0, 1, 2]);
        assert_eq!(result.fronts.len(), 3);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            f(&[1.0, 5.0]),
            f(&[3.0, 3.0]),
            f(&[5.0, 1.0]),
            f(&[4.0, 4.0]),
            f(&[6.0, 6.0]),
        ];
        let result = non_dominated_sort(&objs, 2);
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_all_equal() {
        let objs = vec![f(&[2.0, 2.0]); 3];
        let result = non_dominated_sort(&objs, 2);
        assert!(result.ranks.iter().all(|&r| r == 0));
    }

    #[test]
    fn test_failed_evaluations_sink() {
        let objs = vec![Fitness::failed(2), f(&[9.0, 9.0]), f(&[1.0, 8.0])];
        let result = non_dominated_sort(&objs, 2);
        assert_eq!(result.ranks[2], 0);
        assert!(result.ranks[0] > result.ranks[2]);
        assert_eq!(pareto_front_indices(&objs, 2), vec![2]);
    }

    #[test]
    fn test_front_excludes_failures_when_all_failed() {
        let objs = vec![Fitness::failed(2), Fitness::failed(2)];
        assert!(pareto_front_indices(&objs, 2).is_empty());
    }
}
