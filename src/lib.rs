//! # Allocation: optimal placement of an order across companies
//!
//! An order for `m` identical machines is split among `n` companies. Company `i`
//! completes its share of `k` machines with probability P[i][k] (P[i][0] = 1).
//! The crate finds the split that maximizes the product of the companies'
//! success probabilities and lists **every** split that reaches it.
//!
//! ## Pipeline
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | 1 | [`types`] | Validated, immutable [`types::ProbabilityMatrix`] |
//! | 2 | [`allocation_table`] | Bottom-up DP over (companies, machines) with exact-equality tie sets |
//! | 3 | [`enumerator`] | Memoized top-down reconstruction of all optimal allocations |
//! | 4 | [`summary`] | [`summary::ResultSummary`]: max probability plus allocations |
//!
//! Around the core:
//! - [`generator`]: random task matrices (one-decimal draws, rows sorted descending)
//! - [`report`]: solution text and LaTeX task sheets
//! - [`storage`]: writing sheets/JSON, loading matrices, `pdflatex`
//! - [`env_config`]: environment reads shared by the binaries
//!
//! ## Example
//!
//! ```
//! use allocation::summary::max_probability_allocation;
//!
//! let summary = max_probability_allocation(2, 2, &[0.9, 0.5, 0.6, 0.8]).unwrap();
//! assert_eq!(summary.formatted_probability(), "0.80000");
//! assert_eq!(summary.allocations[0].to_vec(), vec![0, 2]);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod allocation_table;
pub mod constants;
pub mod enumerator;
pub mod env_config;
pub mod error;
pub mod generator;
pub mod report;
pub mod storage;
pub mod summary;
pub mod types;

pub use error::{AllocationError, Result};
pub use summary::{max_probability_allocation, solve, solve_with_options, ResultSummary};
pub use types::{Allocation, ProbabilityMatrix, SolveOptions};
