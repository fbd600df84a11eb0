//! Well Econ CLI
//!
//! Evaluate one well: reversions, economic limit and the final cash flow

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use well_econ::well::{load_daily_production, load_monthly_production};
use well_econ::{load_well_input, WellEvaluator};

#[derive(Parser, Debug)]
#[command(name = "well_econ")]
#[command(about = "Ownership reversions and economic limit for a single well")]
struct Args {
    /// Well input document (JSON)
    #[arg(short, long)]
    well: PathBuf,

    /// Monthly production CSV (date,oil,gas,water); replaces the document's
    #[arg(short, long)]
    production: Option<PathBuf>,

    /// Daily production CSV (date,oil,gas,water)
    #[arg(short, long)]
    daily: Option<PathBuf>,

    /// Print the full evaluation as JSON
    #[arg(long)]
    json: bool,

    /// Monthly rows to print
    #[arg(long, default_value = "24")]
    rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut well = load_well_input(&args.well)
        .with_context(|| format!("Failed to load well input {}", args.well.display()))?;
    if let Some(path) = &args.production {
        well.production.monthly = load_monthly_production(path)
            .with_context(|| format!("Failed to load monthly production {}", path.display()))?;
    }
    if let Some(path) = &args.daily {
        well.production.daily = load_daily_production(path)
            .with_context(|| format!("Failed to load daily production {}", path.display()))?;
    }

    let evaluation = WellEvaluator::new()
        .evaluate(&well)
        .with_context(|| format!("Evaluation failed for well {}", well.well_id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    println!("Well Econ v{}", env!("CARGO_PKG_VERSION"));
    println!("==============\n");
    println!("Well: {}", evaluation.well_id);
    println!("  First Production: {}", well.date_dict.first_production_date);
    println!("  As Of:            {}", well.date_dict.as_of_date);
    println!();

    println!("Reversions ({}):", evaluation.reversion.reversion_details.len());
    for detail in &evaluation.reversion.reversion_details {
        println!(
            "  {:<28} {}  (month {:>4})  WI {:>8.4} -> {:>8.4}",
            detail.rev_key.as_str(),
            detail.date,
            detail.t,
            detail.before,
            detail.after
        );
    }
    println!();

    println!("Economic Limit:");
    println!("  Cutoff Date: {}", evaluation.cutoff.cutoff_date);
    println!("  Month:       {}", evaluation.cutoff.t_cutoff);
    println!("  Uneconomic:  {}", evaluation.cutoff.unecon);
    println!();

    let econ = &evaluation.econ;
    println!("Cash Flow ({} months):", econ.len());
    println!(
        "{:>5} {:>10} {:>8} {:>14} {:>14} {:>12} {:>14} {:>14}",
        "Month", "Date", "WI", "Revenue", "Expense", "Tax", "Capex", "BFIT CF"
    );
    println!("{}", "-".repeat(98));
    for i in 0..econ.len().min(args.rows) {
        println!(
            "{:>5} {:>10} {:>8.4} {:>14.2} {:>14.2} {:>12.2} {:>14.2} {:>14.2}",
            econ.time[i],
            econ.dates[i].to_string(),
            econ.wi[i],
            econ.revenue[i],
            econ.expense[i],
            econ.production_tax[i],
            econ.capex[i],
            econ.bfit_cf[i]
        );
    }
    if econ.len() > args.rows {
        println!("  ... {} more months", econ.len() - args.rows);
    }
    println!();

    let summary = &evaluation.summary;
    let table = &well.general_option_model.discount_table;
    println!("Summary:");
    println!("  Revenue:        ${:>16.2}", summary.total_revenue);
    println!("  Expense:        ${:>16.2}", summary.total_expense);
    println!("  Production Tax: ${:>16.2}", summary.total_production_tax);
    println!("  Capex:          ${:>16.2}", summary.total_capex);
    println!("  BFIT CF:        ${:>16.2}", summary.total_bfit_cf);
    println!("  NPV @ {:>5.1}%:   ${:>16.2}", table.first_discount, evaluation.npv_first);
    println!("  NPV @ {:>5.1}%:   ${:>16.2}", table.second_discount, evaluation.npv_second);
    match summary.irr {
        Some(irr) => println!("  IRR:            {:>17.2}%", irr * 100.0),
        None => println!("  IRR:            {:>18}", "n/a"),
    }

    Ok(())
}
