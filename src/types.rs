use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::constants::ZERO_UNITS_PROBABILITY;
use crate::error::{AllocationError, Result};

/// Success probabilities P[i][k] for `companies` rows and `machines` columns.
///
/// Column `k - 1` of row `i` holds the probability that company `i` completes
/// the order when it receives exactly `k` machines. Stored row-major. Every
/// cell is finite and in [0, 1]; there is no way to mutate a built matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix", into = "RawMatrix")]
pub struct ProbabilityMatrix {
    companies: usize,
    machines: usize,
    values: Vec<f64>,
}

/// Wire shape of a matrix, validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawMatrix {
    companies: usize,
    machines: usize,
    probabilities: Vec<f64>,
}

impl TryFrom<RawMatrix> for ProbabilityMatrix {
    type Error = AllocationError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        ProbabilityMatrix::new(raw.companies, raw.machines, raw.probabilities)
    }
}

impl From<ProbabilityMatrix> for RawMatrix {
    fn from(matrix: ProbabilityMatrix) -> Self {
        RawMatrix {
            companies: matrix.companies,
            machines: matrix.machines,
            probabilities: matrix.values,
        }
    }
}

impl ProbabilityMatrix {
    /// Reshape a flat row-major vector into a `companies × machines` matrix.
    pub fn new(companies: usize, machines: usize, values: Vec<f64>) -> Result<Self> {
        if companies == 0 {
            return Err(AllocationError::NoActors);
        }
        let Some(expected) = companies.checked_mul(machines) else {
            return Err(AllocationError::ShapeMismatch {
                expected: usize::MAX,
                actual: values.len(),
            });
        };
        if values.len() != expected {
            return Err(AllocationError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        for (idx, &value) in values.iter().enumerate() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AllocationError::InvalidProbability {
                    actor: idx / machines,
                    units: idx % machines + 1,
                    value,
                });
            }
        }
        Ok(Self {
            companies,
            machines,
            values,
        })
    }

    /// Build from one row per company. Rows must all have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let machines = rows.first().map_or(0, |r| r.len());
        let actual: usize = rows.iter().map(|r| r.len()).sum();
        if rows.iter().any(|r| r.len() != machines) {
            return Err(AllocationError::ShapeMismatch {
                expected: rows.len().saturating_mul(machines),
                actual,
            });
        }
        Self::new(rows.len(), machines, rows.concat())
    }

    pub fn companies(&self) -> usize {
        self.companies
    }

    pub fn machines(&self) -> usize {
        self.machines
    }

    /// P[actor][units], with P[actor][0] = 1. `actor` is zero-based.
    #[inline(always)]
    pub fn probability(&self, actor: usize, units: usize) -> f64 {
        if units == 0 {
            ZERO_UNITS_PROBABILITY
        } else {
            self.values[actor * self.machines + units - 1]
        }
    }

    /// Probabilities for 1..=machines units of one company.
    pub fn row(&self, actor: usize) -> &[f64] {
        &self.values[actor * self.machines..(actor + 1) * self.machines]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.companies).map(move |actor| self.row(actor))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Joint success probability of `allocation`, multiplied in company order.
    pub fn joint_probability(&self, allocation: &[usize]) -> f64 {
        allocation
            .iter()
            .enumerate()
            .fold(1.0, |acc, (actor, &units)| {
                acc * self.probability(actor, units)
            })
    }
}

impl fmt::Display for ProbabilityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (actor, row) in self.rows().enumerate() {
            if actor > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(|p| format!("{:?}", p)).collect();
            write!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

/// Machines per company, in company order. Entries sum to the machine count.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(Vec<usize>);

impl Allocation {
    pub fn new(units: Vec<usize>) -> Self {
        Self(units)
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl Deref for Allocation {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Allocation {
    fn from(units: Vec<usize>) -> Self {
        Self(units)
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.0.iter().map(|u| u.to_string()).collect();
        write!(f, "[{}]", cells.join(", "))
    }
}

/// Solver knobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveOptions {
    /// Fill each DP layer with rayon instead of a sequential loop.
    pub parallel: bool,
    /// Keep at most this many optimal allocations in the summary.
    pub max_allocations: Option<usize>,
}
