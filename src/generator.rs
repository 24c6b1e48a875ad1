//! Random task matrices: uniform draws rounded to one decimal, each company's
//! row sorted in descending order (more machines never raise the odds).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::constants::PROBABILITY_DECIMALS;
use crate::error::Result;
use crate::types::ProbabilityMatrix;

/// Draw one `companies × machines` matrix from `rng`.
pub fn generate_probabilities<R: Rng>(
    companies: usize,
    machines: usize,
    rng: &mut R,
) -> Result<ProbabilityMatrix> {
    let scale = 10f64.powi(PROBABILITY_DECIMALS);
    let mut values = Vec::with_capacity(companies * machines);
    for _ in 0..companies {
        let mut row: Vec<f64> = (0..machines)
            .map(|_| (rng.random_range(0.0..=1.0f64) * scale).round() / scale)
            .collect();
        row.sort_by(|a, b| b.total_cmp(a));
        values.extend(row);
    }
    ProbabilityMatrix::new(companies, machines, values)
}

/// `count` independent matrices; variant `i` is seeded with `seed + i`.
pub fn generate_variants(
    count: usize,
    companies: usize,
    machines: usize,
    seed: u64,
) -> Result<Vec<ProbabilityMatrix>> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            generate_probabilities(companies, machines, &mut rng)
        })
        .collect()
}
