//! Entry points: matrix in, [`ResultSummary`] out.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocation_table::AllocationTable;
use crate::constants::REPORT_PRECISION;
use crate::enumerator::AllocationEnumerator;
use crate::error::Result;
use crate::types::{Allocation, ProbabilityMatrix, SolveOptions};

/// Optimal joint probability dp[n][m] and the allocations that reach it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub companies: usize,
    pub machines: usize,
    pub max_probability: f64,
    pub allocations: Vec<Allocation>,
    /// Number of optimal allocations, including any cut by a cap.
    pub total_allocations: u64,
    pub truncated: bool,
}

impl ResultSummary {
    /// Max probability with [`REPORT_PRECISION`] decimals.
    pub fn formatted_probability(&self) -> String {
        format!("{:.*}", REPORT_PRECISION, self.max_probability)
    }
}

/// Solve an `n × m` problem given flat row-major probabilities.
pub fn max_probability_allocation(
    companies: usize,
    machines: usize,
    probabilities: &[f64],
) -> Result<ResultSummary> {
    let matrix = ProbabilityMatrix::new(companies, machines, probabilities.to_vec())?;
    Ok(solve(&matrix))
}

/// Solve with default options: sequential fill, no cap.
pub fn solve(matrix: &ProbabilityMatrix) -> ResultSummary {
    solve_with_options(matrix, &SolveOptions::default())
}

pub fn solve_with_options(matrix: &ProbabilityMatrix, options: &SolveOptions) -> ResultSummary {
    let start = Instant::now();
    let table = if options.parallel {
        AllocationTable::build_parallel(matrix)
    } else {
        AllocationTable::build(matrix)
    };
    let enumeration = AllocationEnumerator::new(&table).enumerate_capped(options.max_allocations);

    let summary = ResultSummary {
        companies: matrix.companies(),
        machines: matrix.machines(),
        max_probability: table.max_probability(),
        allocations: enumeration.allocations,
        total_allocations: enumeration.total,
        truncated: enumeration.truncated,
    };
    info!(
        companies = summary.companies,
        machines = summary.machines,
        max_probability = summary.max_probability,
        optimal = summary.total_allocations,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "solved allocation problem"
    );
    summary
}
