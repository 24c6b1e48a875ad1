//! Bottom-up fill of the allocation table dp[i][j] and its tie sets.
//!
//! dp[i][j] is the best joint success probability when `j` machines are split
//! among the first `i` companies. Layer `i` depends only on layer `i - 1`, so
//! layers are filled in order; cells inside one layer are independent and can be
//! computed in parallel (see [`AllocationTable::build_parallel`]).
//!
//! Ties are detected with exact `f64` equality. Inputs rounded to one decimal
//! make equal products common, and those ties are what the enumerator reports.

use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::constants::{cell_index, is_reachable};
use crate::types::ProbabilityMatrix;

/// Filled DP table: one value and one tie set per (actor prefix, units) cell.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocationTable {
    companies: usize,
    machines: usize,
    /// dp values in [`cell_index`] order. Unreachable cells hold 0.0.
    values: Vec<f64>,
    /// ties[cell] = ascending quantities `k` given to the last company that
    /// attain the cell's value.
    ties: Vec<Vec<usize>>,
}

impl AllocationTable {
    /// Fill layer by layer on the current thread.
    pub fn build(matrix: &ProbabilityMatrix) -> Self {
        Self::fill(matrix, false)
    }

    /// Fill each layer with rayon. Produces the same table as [`Self::build`].
    pub fn build_parallel(matrix: &ProbabilityMatrix) -> Self {
        Self::fill(matrix, true)
    }

    fn fill(matrix: &ProbabilityMatrix, parallel: bool) -> Self {
        let companies = matrix.companies();
        let machines = matrix.machines();
        let row_len = machines + 1;
        let start = Instant::now();

        let mut values = vec![0.0f64; (companies + 1) * row_len];
        let mut ties: Vec<Vec<usize>> = vec![Vec::new(); (companies + 1) * row_len];
        values[cell_index(0, 0, machines)] = 1.0;
        ties[cell_index(0, 0, machines)].push(0);

        for i in 1..=companies {
            // Read-only view of layer i - 1 for this layer's cells
            let prev = &values[cell_index(i - 1, 0, machines)..cell_index(i, 0, machines)];
            let layer: Vec<(f64, Vec<usize>)> = if parallel {
                (0..row_len)
                    .into_par_iter()
                    .map(|j| solve_cell(matrix, prev, i, j))
                    .collect()
            } else {
                (0..row_len).map(|j| solve_cell(matrix, prev, i, j)).collect()
            };

            // Scatter layer i back before layer i + 1 reads it
            for (j, (value, cell_ties)) in layer.into_iter().enumerate() {
                let idx = cell_index(i, j, machines);
                values[idx] = value;
                ties[idx] = cell_ties;
            }
            debug!(layer = i, machines, parallel, "filled allocation layer");
        }

        debug!(
            companies,
            machines,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "allocation table complete"
        );

        Self {
            companies,
            machines,
            values,
            ties,
        }
    }

    pub fn companies(&self) -> usize {
        self.companies
    }

    pub fn machines(&self) -> usize {
        self.machines
    }

    /// dp[actors][units], or `None` when no split exists (no actors, units > 0).
    pub fn value(&self, actors: usize, units: usize) -> Option<f64> {
        if actors > self.companies || units > self.machines || !is_reachable(actors, units) {
            return None;
        }
        Some(self.values[cell_index(actors, units, self.machines)])
    }

    /// dp[n][m]: best joint success probability over the whole problem.
    pub fn max_probability(&self) -> f64 {
        self.values[cell_index(self.companies, self.machines, self.machines)]
    }

    /// Quantities for company `actors` (1-based) that attain dp[actors][units].
    ///
    /// Every listed `k` leads to a reachable predecessor dp[actors - 1][units - k].
    /// Layer 0 reports `[0]` at zero units and nothing elsewhere.
    pub fn ties(&self, actors: usize, units: usize) -> &[usize] {
        if actors > self.companies || units > self.machines {
            return &[];
        }
        &self.ties[cell_index(actors, units, self.machines)]
    }
}

/// Best value and tie set for dp[i][j] given the completed layer i - 1.
fn solve_cell(matrix: &ProbabilityMatrix, prev: &[f64], i: usize, j: usize) -> (f64, Vec<usize>) {
    let mut best: Option<f64> = None;
    let mut cell_ties: Vec<usize> = Vec::new();

    for k in 0..=j {
        if !is_reachable(i - 1, j - k) {
            continue;
        }
        let candidate = prev[j - k] * matrix.probability(i - 1, k);
        match best {
            Some(b) if candidate < b => {}
            Some(b) if candidate == b => cell_ties.push(k),
            _ => {
                best = Some(candidate);
                cell_ties.clear();
                cell_ties.push(k);
            }
        }
    }

    // k = j always has the reachable predecessor dp[i - 1][0], so best is set
    (best.unwrap_or(0.0), cell_ties)
}
