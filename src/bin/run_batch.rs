//! Evaluate every well document in a directory
//!
//! Writes one summary row per well to a CSV file; wells that fail are
//! logged and listed at the end rather than stopping the batch.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use well_econ::well::well_files;
use well_econ::{load_well_input, WellEvaluator};

#[derive(Parser, Debug)]
#[command(name = "run_batch")]
#[command(about = "Evaluate a directory of well input documents")]
struct Args {
    /// Directory of well input documents (*.json)
    #[arg(short, long)]
    input: PathBuf,

    /// Summary CSV to write
    #[arg(short, long, default_value = "well_summary.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading wells from {}...", args.input.display());

    let files = well_files(&args.input)
        .with_context(|| format!("Failed to list well documents in {}", args.input.display()))?;
    let mut wells = Vec::with_capacity(files.len());
    for path in &files {
        let well = load_well_input(path).with_context(|| format!("Failed to load {}", path.display()))?;
        wells.push(well);
    }
    println!("Loaded {} wells in {:?}", wells.len(), start.elapsed());

    println!("Running evaluations...");
    let eval_start = Instant::now();
    let evaluator = WellEvaluator::new();
    let results = evaluator.evaluate_batch(&wells);
    println!("Evaluations complete in {:?}", eval_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut failures = Vec::new();
    let mut total_npv = 0.0;
    let mut unecon = 0;
    for (well_id, result) in &results {
        match result {
            Ok(evaluation) => {
                let row = evaluation.summary_row();
                total_npv += row.npv_first;
                if row.unecon {
                    unecon += 1;
                }
                writer.serialize(row)?;
            }
            Err(e) => failures.push((well_id, e)),
        }
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    println!("\nBatch Summary:");
    println!("  Wells:       {}", results.len());
    println!("  Evaluated:   {}", results.len() - failures.len());
    println!("  Uneconomic:  {}", unecon);
    println!("  Total NPV:   ${:.2}", total_npv);
    if !failures.is_empty() {
        println!("\nFailed wells:");
        for (well_id, e) in &failures {
            let kind = if e.is_expected() { "input" } else { "error" };
            println!("  {} [{}]: {}", well_id, kind, e);
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
