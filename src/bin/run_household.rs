//! Run projections for every pension in a household file
//!
//! Outputs household totals per scenario, one row per calendar month

use anyhow::Context;
use clap::Parser;
use log::info;
use pension_projection::{
    config::HouseholdRequest,
    projection::ProjectionParams,
    scenario::{HouseholdProjection, ScenarioRunner},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_household", about = "Project and aggregate all pensions of a household")]
struct Args {
    /// Household JSON file ({"pensions": [...]})
    household: PathBuf,

    /// Aggregated output CSV
    #[arg(short, long, default_value = "household_projection_output.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading pensions from {}...", args.household.display());

    let pensions = HouseholdRequest::from_path(&args.household)
        .with_context(|| format!("reading household {}", args.household.display()))?
        .into_params()?;
    println!("Loaded {} pensions in {:?}", pensions.len(), start.elapsed());

    let (labels, params): (Vec<String>, Vec<ProjectionParams>) = pensions.into_iter().unzip();

    println!("Running projections...");
    let proj_start = Instant::now();
    let outputs = ScenarioRunner::new().run_batch(&params);
    println!("Projections complete in {:?}", proj_start.elapsed());

    for (label, output) in labels.iter().zip(&outputs) {
        info!(
            "{}: {} points, realistic final value {:.2}",
            label, output.metadata.data_points, output.realistic.final_value
        );
    }

    println!("Aggregating results...");
    let household = HouseholdProjection::aggregate(&outputs);

    let mut file = BufWriter::new(
        File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?,
    );
    writeln!(file, "Month,Pensions,Pessimistic,Realistic,Optimistic,Contribution")?;
    for (date, row) in &household.rows {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2}",
            date, row.pensions, row.pessimistic, row.realistic, row.optimistic, row.contribution,
        )?;
    }
    file.flush()?;
    println!("Output written to {}", args.output.display());

    println!("\nHousehold Summary:");
    for (label, output) in labels.iter().zip(&outputs) {
        println!(
            "  {:<20} {} -> {}  realistic {:>14.2}",
            label, output.metadata.start_date, output.metadata.end_date, output.realistic.final_value
        );
    }
    println!("  Total contributions:        {:.2}", household.total_contributions);
    println!("  Final value (pessimistic):  {:.2}", household.total_final_pessimistic);
    println!("  Final value (realistic):    {:.2}", household.total_final_realistic);
    println!("  Final value (optimistic):   {:.2}", household.total_final_optimistic);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
