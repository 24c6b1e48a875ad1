//! allocation-solve: solve one probability matrix read from a JSON file.

use std::path::PathBuf;

use allocation::report::solution_text;
use allocation::storage::load_matrix;
use allocation::summary::solve_with_options;
use allocation::types::SolveOptions;

fn main() {
    allocation::env_config::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut matrix_path: Option<PathBuf> = None;
    let mut options = SolveOptions::default();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--matrix" => {
                i += 1;
                match args.get(i) {
                    Some(p) => matrix_path = Some(PathBuf::from(p)),
                    None => {
                        eprintln!("Missing value for --matrix");
                        std::process::exit(1);
                    }
                }
            }
            "--max-allocations" => {
                i += 1;
                let cap = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("Invalid --max-allocations value");
                    std::process::exit(1);
                });
                options.max_allocations = Some(cap);
            }
            "--parallel" => options.parallel = true,
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(matrix_path) = matrix_path else {
        eprintln!("--matrix is required");
        print_usage();
        std::process::exit(1);
    };
    if options.parallel {
        allocation::env_config::init_rayon_threads();
    }

    let matrix = match load_matrix(&matrix_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to load {}: {}", matrix_path.display(), e);
            std::process::exit(1);
        }
    };

    let summary = solve_with_options(&matrix, &options);
    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("JSON serialization failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", solution_text(&matrix, &summary));
    }
}

fn print_usage() {
    println!(
        "allocation-solve: Optimal machine allocation for one probability matrix.

USAGE:
    allocation-solve --matrix <FILE> [OPTIONS]

OPTIONS:
    --matrix <FILE>         JSON: {{\"companies\": n, \"machines\": m, \"probabilities\": [...]}}
    --max-allocations <C>   Keep at most C optimal allocations
    --parallel              Fill DP layers in parallel
    --json                  Print the summary as JSON
    -h, --help              Print this help"
    );
}
