//! allocation-tasks: generate task variants, solve them, and write LaTeX sheets.
//!
//! Produces two documents in the output directory:
//! - tasks_only.tex: task statements and probability tables
//! - tasks_with_solutions.tex: the same tasks followed by their solutions

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use allocation::constants::{
    DEFAULT_COMPANIES, DEFAULT_MACHINES, DEFAULT_SEED, DEFAULT_VARIANTS, SUMMARIES_JSON_FILE,
    TASKS_ONLY_FILE, TASKS_WITH_SOLUTIONS_FILE,
};
use allocation::generator::generate_variants;
use allocation::report::{latex_document, Variant};
use allocation::storage::{compile_latex_to_pdf, save_document, save_summaries_json};
use allocation::summary::{solve_with_options, ResultSummary};
use allocation::types::SolveOptions;

struct Args {
    companies: usize,
    machines: usize,
    variants: usize,
    seed: u64,
    output: Option<PathBuf>,
    max_allocations: Option<usize>,
    parallel: bool,
    compile: bool,
    json: bool,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let Some(raw) = value else {
        eprintln!("Missing value for {}", flag);
        std::process::exit(1);
    };
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", flag, raw);
        std::process::exit(1);
    })
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        companies: DEFAULT_COMPANIES,
        machines: DEFAULT_MACHINES,
        variants: DEFAULT_VARIANTS,
        seed: DEFAULT_SEED,
        output: None,
        max_allocations: None,
        parallel: false,
        compile: false,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--companies" => {
                i += 1;
                parsed.companies = parse_value("--companies", args.get(i));
            }
            "--machines" => {
                i += 1;
                parsed.machines = parse_value("--machines", args.get(i));
            }
            "--variants" => {
                i += 1;
                parsed.variants = parse_value("--variants", args.get(i));
            }
            "--seed" => {
                i += 1;
                parsed.seed = parse_value("--seed", args.get(i));
            }
            "--output" => {
                i += 1;
                parsed.output = Some(parse_value("--output", args.get(i)));
            }
            "--max-allocations" => {
                i += 1;
                parsed.max_allocations = Some(parse_value("--max-allocations", args.get(i)));
            }
            "--parallel" => parsed.parallel = true,
            "--compile" => parsed.compile = true,
            "--json" => parsed.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn main() {
    allocation::env_config::init_tracing();
    let args = parse_args();
    let threads = allocation::env_config::init_rayon_threads();
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(allocation::env_config::output_dir);

    println!("=== allocation-tasks ===");
    println!(
        "{} variants of {} companies x {} machines (seed {}, {} threads)",
        args.variants, args.companies, args.machines, args.seed, threads
    );

    let matrices = match generate_variants(args.variants, args.companies, args.machines, args.seed) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to generate variants: {}", e);
            std::process::exit(1);
        }
    };

    let options = SolveOptions {
        parallel: args.parallel,
        max_allocations: args.max_allocations,
    };
    let t0 = Instant::now();
    let summaries: Vec<ResultSummary> = matrices
        .par_iter()
        .map(|matrix| solve_with_options(matrix, &options))
        .collect();
    println!(
        "Solved {} variants in {:.2} ms",
        summaries.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    for (i, summary) in summaries.iter().enumerate() {
        println!(
            "  Variant {:2}: P = {} ({} optimal allocations)",
            i + 1,
            summary.formatted_probability(),
            summary.total_allocations
        );
    }

    let variants: Vec<Variant<'_>> = matrices
        .iter()
        .zip(&summaries)
        .map(|(matrix, summary)| Variant { matrix, summary })
        .collect();

    let mut documents = Vec::new();
    for (name, with_solutions) in [(TASKS_ONLY_FILE, false), (TASKS_WITH_SOLUTIONS_FILE, true)] {
        let path = output_dir.join(name);
        if let Err(e) = save_document(&path, &latex_document(&variants, with_solutions)) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("Wrote {}", path.display());
        documents.push(path);
    }

    if args.json {
        let path = output_dir.join(SUMMARIES_JSON_FILE);
        if let Err(e) = save_summaries_json(&path, &summaries) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("Wrote {}", path.display());
    }

    if args.compile {
        let mut failed = false;
        for path in &documents {
            match compile_latex_to_pdf(path) {
                Ok(pdf) => println!("PDF file created: {}", pdf.display()),
                Err(e) => {
                    eprintln!("Error during LaTeX compilation: {}", e);
                    failed = true;
                }
            }
        }
        if failed {
            std::process::exit(1);
        }
    }

    println!("Done.");
}

fn print_usage() {
    println!(
        "allocation-tasks: Generate machine-allocation tasks and their solutions.

USAGE:
    allocation-tasks [OPTIONS]

OPTIONS:
    --companies <N>         Companies per task [default: 4]
    --machines <M>          Machines per task [default: 5]
    --variants <K>          Number of task variants [default: 3]
    --seed <S>              RNG seed; variant i uses S + i [default: 42]
    --output <DIR>          Output directory [default: $ALLOCATION_OUTPUT_DIR or output]
    --max-allocations <C>   Keep at most C optimal allocations per task
    --parallel              Fill DP layers in parallel
    --json                  Also write summaries.json
    --compile               Run pdflatex on both documents
    -h, --help              Print this help

OUTPUT:
    <DIR>/tasks_only.tex             Task statements
    <DIR>/tasks_with_solutions.tex   Task statements with solutions"
    );
}
