//! Property-based tests for the allocation table and enumerator.
//!
//! Brute force lists every composition of `m` into `n` parts and multiplies
//! probabilities in company order, the same order the DP uses.

use std::collections::HashSet;

use proptest::prelude::*;

use allocation::allocation_table::AllocationTable;
use allocation::enumerator::AllocationEnumerator;
use allocation::summary::solve;
use allocation::types::ProbabilityMatrix;

/// Every way to split `units` among `parts` companies.
fn compositions(parts: usize, units: usize) -> Vec<Vec<usize>> {
    if parts == 0 {
        return if units == 0 { vec![Vec::new()] } else { Vec::new() };
    }
    let mut out = Vec::new();
    for first in 0..=units {
        for mut rest in compositions(parts - 1, units - first) {
            rest.insert(0, first);
            out.push(rest);
        }
    }
    out
}

fn brute_force_max(matrix: &ProbabilityMatrix, actors: usize, units: usize) -> f64 {
    compositions(actors, units)
        .iter()
        .map(|a| matrix.joint_probability(a))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Strategy: matrix with entries on the one-decimal grid used for task sheets.
fn decimal_matrix() -> impl Strategy<Value = ProbabilityMatrix> {
    (1..=4usize, 0..=5usize).prop_flat_map(|(n, m)| {
        prop::collection::vec(0..=10u8, n * m).prop_map(move |cells| {
            let values = cells.into_iter().map(|c| c as f64 / 10.0).collect();
            ProbabilityMatrix::new(n, m, values).unwrap()
        })
    })
}

/// Strategy: dyadic entries, so every product below is exact in f64.
fn dyadic_matrix() -> impl Strategy<Value = ProbabilityMatrix> {
    (1..=4usize, 0..=5usize).prop_flat_map(|(n, m)| {
        prop::collection::vec(0..=4u8, n * m).prop_map(move |cells| {
            let values = cells.into_iter().map(|c| c as f64 / 4.0).collect();
            ProbabilityMatrix::new(n, m, values).unwrap()
        })
    })
}

/// Strategy: every company gets a capacity `c` past which its probabilities
/// are 0, with capacities summing below `m`. Any split then overloads some
/// company, so the optimum is 0, while entries within capacity stay random.
fn zero_optimum_matrix() -> impl Strategy<Value = ProbabilityMatrix> {
    (1..=4usize, 1..=5usize).prop_flat_map(|(n, m)| {
        (
            prop::collection::vec(0..=10u8, n * m),
            prop::collection::vec(0..=m, n),
        )
            .prop_map(move |(cells, mut caps)| {
                while caps.iter().sum::<usize>() >= m {
                    if let Some(largest) = caps.iter_mut().max() {
                        *largest -= 1;
                    }
                }
                let values = cells
                    .into_iter()
                    .enumerate()
                    .map(|(idx, c)| {
                        let units = idx % m + 1;
                        if units > caps[idx / m] {
                            0.0
                        } else {
                            c as f64 / 10.0
                        }
                    })
                    .collect();
                ProbabilityMatrix::new(n, m, values).unwrap()
            })
    })
}

proptest! {
    // 1. Every dp cell equals the brute-force maximum of its subproblem
    #[test]
    fn table_matches_brute_force(matrix in decimal_matrix()) {
        let table = AllocationTable::build(&matrix);
        for i in 1..=matrix.companies() {
            for j in 0..=matrix.machines() {
                let expected = brute_force_max(&matrix, i, j);
                prop_assert_eq!(table.value(i, j), Some(expected), "cell ({}, {})", i, j);
            }
        }
    }

    // 2. Allocations have n entries in [0, m] summing to m
    #[test]
    fn allocations_well_formed(matrix in decimal_matrix()) {
        let summary = solve(&matrix);
        prop_assert!(!summary.allocations.is_empty());
        for a in &summary.allocations {
            prop_assert_eq!(a.len(), matrix.companies());
            prop_assert_eq!(a.total(), matrix.machines());
            prop_assert!(a.iter().all(|&u| u <= matrix.machines()));
        }
    }

    // 3. No duplicate allocations
    #[test]
    fn allocations_unique(matrix in decimal_matrix()) {
        let summary = solve(&matrix);
        let unique: HashSet<_> = summary.allocations.iter().collect();
        prop_assert_eq!(unique.len(), summary.allocations.len());
    }

    // 4. Every allocation's product equals the reported maximum
    #[test]
    fn allocations_reach_maximum(matrix in decimal_matrix()) {
        let summary = solve(&matrix);
        for a in &summary.allocations {
            let p = matrix.joint_probability(a);
            prop_assert!((p - summary.max_probability).abs() < 1e-12, "{} vs {}", p, summary.max_probability);
        }
    }

    // 5. Enumerated allocations are a subset of the brute-force optima
    #[test]
    fn allocations_subset_of_brute_force(matrix in decimal_matrix()) {
        let summary = solve(&matrix);
        let best = brute_force_max(&matrix, matrix.companies(), matrix.machines());
        prop_assert_eq!(summary.max_probability, best);
        let optimal: HashSet<Vec<usize>> = compositions(matrix.companies(), matrix.machines())
            .into_iter()
            .filter(|a| matrix.joint_probability(a) == best)
            .collect();
        for a in &summary.allocations {
            prop_assert!(optimal.contains(&a.to_vec()), "{} not optimal", a);
        }
    }

    // 6. With exact arithmetic and a positive optimum, nothing is missed
    #[test]
    fn dyadic_positive_optimum_is_complete(matrix in dyadic_matrix()) {
        let summary = solve(&matrix);
        prop_assume!(summary.max_probability > 0.0);
        let optimal: HashSet<Vec<usize>> = compositions(matrix.companies(), matrix.machines())
            .into_iter()
            .filter(|a| matrix.joint_probability(a) == summary.max_probability)
            .collect();
        let found: HashSet<Vec<usize>> = summary.allocations.iter().map(|a| a.to_vec()).collect();
        prop_assert_eq!(found, optimal);
    }

    // 7. Parallel fill, streaming, and counting agree with the sequential path
    #[test]
    fn fill_and_enumeration_modes_agree(matrix in decimal_matrix()) {
        let table = AllocationTable::build(&matrix);
        prop_assert_eq!(&table, &AllocationTable::build_parallel(&matrix));

        let e = AllocationEnumerator::new(&table);
        let materialized = e.enumerate();
        let streamed: Vec<_> = e.iter().collect();
        prop_assert_eq!(&streamed, &materialized);
        prop_assert_eq!(e.count(), materialized.len() as u64);
    }

    // 8. A company with only zero probabilities gets nothing unless the optimum is 0
    #[test]
    fn zero_row_company_gets_nothing(matrix in decimal_matrix(), pick in 0..4usize) {
        let n = matrix.companies();
        let m = matrix.machines();
        let zero_actor = pick % n;
        let mut values = matrix.as_slice().to_vec();
        for k in 0..m {
            values[zero_actor * m + k] = 0.0;
        }
        let matrix = ProbabilityMatrix::new(n, m, values).unwrap();
        let summary = solve(&matrix);
        if summary.max_probability > 0.0 {
            for a in &summary.allocations {
                prop_assert_eq!(a[zero_actor], 0);
            }
        }
    }

    // 9. With a zero optimum every composition is optimal and listed, in every mode
    #[test]
    fn zero_optimum_lists_every_composition(matrix in zero_optimum_matrix()) {
        let (n, m) = (matrix.companies(), matrix.machines());
        let summary = solve(&matrix);
        prop_assert_eq!(summary.max_probability, 0.0);
        prop_assert_eq!(brute_force_max(&matrix, n, m), 0.0);

        let all: HashSet<Vec<usize>> = compositions(n, m).into_iter().collect();
        let found: HashSet<Vec<usize>> = summary.allocations.iter().map(|a| a.to_vec()).collect();
        prop_assert_eq!(summary.allocations.len(), all.len());
        prop_assert_eq!(&found, &all);
        prop_assert_eq!(summary.total_allocations, all.len() as u64);

        let table = AllocationTable::build(&matrix);
        let e = AllocationEnumerator::new(&table);
        let streamed: Vec<_> = e.iter().collect();
        prop_assert_eq!(&streamed, &summary.allocations);
    }

    // 10. A capped enumeration is a prefix of the full order and flags truncation
    #[test]
    fn capped_enumeration_is_prefix(matrix in decimal_matrix()) {
        let table = AllocationTable::build(&matrix);
        let e = AllocationEnumerator::new(&table);
        let full = e.enumerate();
        let total = full.len();
        for cap in 0..=total + 1 {
            let capped = e.enumerate_capped(Some(cap));
            prop_assert_eq!(&capped.allocations[..], &full[..cap.min(total)], "cap {}", cap);
            prop_assert_eq!(capped.total, total as u64);
            prop_assert_eq!(capped.truncated, cap < total, "cap {}", cap);
        }
    }
}

#[test]
fn all_ones_every_composition_is_optimal() {
    for (n, m) in [(1, 4), (2, 3), (3, 3), (4, 5)] {
        let matrix = ProbabilityMatrix::new(n, m, vec![1.0; n * m]).unwrap();
        let summary = solve(&matrix);
        assert_eq!(summary.max_probability, 1.0);

        let found: HashSet<Vec<usize>> = summary.allocations.iter().map(|a| a.to_vec()).collect();
        let expected: HashSet<Vec<usize>> = compositions(n, m).into_iter().collect();
        assert_eq!(found, expected, "n={n} m={m}");
    }
}

#[test]
fn brute_force_two_by_three() {
    let matrix =
        ProbabilityMatrix::from_rows(&[vec![0.8, 0.6, 0.3], vec![0.9, 0.4, 0.2]]).unwrap();
    let table = AllocationTable::build(&matrix);
    for j in 0..=3 {
        assert_eq!(table.value(2, j), Some(brute_force_max(&matrix, 2, j)));
    }
    // (2, 1) beats (1, 2) = 0.32, (3, 0) = 0.3 and (0, 3) = 0.2
    assert_eq!(table.max_probability(), 0.6 * 0.9);
    assert_eq!(table.ties(2, 3), &[1]);
}
