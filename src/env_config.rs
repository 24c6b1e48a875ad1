//! Shared environment configuration for the allocation binaries.
//!
//! Consolidates `ALLOCATION_OUTPUT_DIR`, `RAYON_NUM_THREADS` and `RUST_LOG`
//! reads shared by both binaries.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Read `ALLOCATION_OUTPUT_DIR` (default `"output"`).
pub fn output_dir() -> PathBuf {
    let dir = std::env::var("ALLOCATION_OUTPUT_DIR").unwrap_or_else(|_| "output".to_string());
    PathBuf::from(dir)
}

/// Read `RAYON_NUM_THREADS` (default 8) and build the rayon global pool.
/// Tolerates an already-initialized pool. Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    num_threads
}

/// Install the fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
