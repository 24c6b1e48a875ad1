//! Problem defaults and table-indexing functions.
//!
//! Maps the problem notation to concrete values:
//! - n = number of companies (actors), default [`DEFAULT_COMPANIES`]
//! - m = number of machines (units), default [`DEFAULT_MACHINES`]
//! - dp[i][j] lives at [`cell_index`]`(i, j, m)` = i * (m + 1) + j
//!
//! The DP table is stored flat, one contiguous row of `m + 1` cells per actor
//! prefix, so a whole layer can be handed out as a slice.

/// Companies per generated task.
pub const DEFAULT_COMPANIES: usize = 4;

/// Machines per generated task.
pub const DEFAULT_MACHINES: usize = 5;

/// Number of task variants rendered into one document.
pub const DEFAULT_VARIANTS: usize = 3;

/// Default RNG seed for variant generation.
pub const DEFAULT_SEED: u64 = 42;

/// Decimal places kept when generating a random probability.
pub const PROBABILITY_DECIMALS: i32 = 1;

/// Decimal digits used when reporting the maximal probability.
pub const REPORT_PRECISION: usize = 5;

/// Probability of an actor that receives zero units: a neutral factor.
pub const ZERO_UNITS_PROBABILITY: f64 = 1.0;

/// Name of the document holding task statements only.
pub const TASKS_ONLY_FILE: &str = "tasks_only.tex";

/// Name of the document holding task statements and their solutions.
pub const TASKS_WITH_SOLUTIONS_FILE: &str = "tasks_with_solutions.tex";

/// Name of the JSON export written next to the documents.
pub const SUMMARIES_JSON_FILE: &str = "summaries.json";

/// Log file written when `pdflatex` fails.
pub const LATEX_ERROR_LOG: &str = "error.log";

/// Map DP cell (actor prefix `i`, units used `j`) to its flat index.
///
/// Layout: `i * (machines + 1) + j`. Valid for `i in 0..=n`, `j in 0..=machines`.
#[inline(always)]
pub fn cell_index(actors: usize, units: usize, machines: usize) -> usize {
    actors * (machines + 1) + units
}

/// Whether dp[i][j] describes a feasible split.
///
/// With no actors, only the empty split of zero units exists.
#[inline(always)]
pub fn is_reachable(actors: usize, units: usize) -> bool {
    actors > 0 || units == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_rows_are_contiguous() {
        let m = 5;
        assert_eq!(cell_index(0, 0, m), 0);
        assert_eq!(cell_index(0, 5, m), 5);
        assert_eq!(cell_index(1, 0, m), 6);
        assert_eq!(cell_index(4, 5, m), 29);
    }

    #[test]
    fn test_only_empty_split_reachable_without_actors() {
        assert!(is_reachable(0, 0));
        assert!(!is_reachable(0, 1));
        assert!(is_reachable(1, 0));
        assert!(is_reachable(3, 7));
    }
}
