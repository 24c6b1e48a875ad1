//! Crate error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building inputs, solving, or writing reports.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("expected {expected} probabilities for the given shape, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("probability for company {actor} with {units} machines is {value}, expected a value in [0, 1]")]
    InvalidProbability { actor: usize, units: usize, value: f64 },

    #[error("at least one company is required")]
    NoActors,

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pdflatex failed on {path}: {stderr}")]
    LatexCompilation { path: PathBuf, stderr: String },
}

pub type Result<T> = std::result::Result<T, AllocationError>;
