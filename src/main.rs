//! Pension Projection CLI
//!
//! Command-line interface for running three-scenario pension projections

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use log::info;
use pension_projection::{
    config::ProjectionRequest,
    projection::{project, CombinedScenariosOutput, ProjectionParams, ScenarioType},
    schedule::{load_steps, validate_steps, warn_overlapping_steps},
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "pension-projection", version, about = "Project a pension under three return scenarios")]
struct Args {
    /// JSON projection request (replaces --steps/--start/--end/--initial-value)
    #[arg(short, long, conflicts_with_all = ["steps", "start", "end", "initial_value"])]
    request: Option<PathBuf>,

    /// Contribution schedule CSV (Amount,Frequency,StartDate,EndDate,Note)
    #[arg(long)]
    steps: Option<PathBuf>,

    /// Current value of the pension
    #[arg(long)]
    initial_value: Option<f64>,

    /// Projection start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Projection horizon, e.g. the retirement date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Override the pessimistic annual rate (percent)
    #[arg(long)]
    pessimistic: Option<f64>,

    /// Override the realistic annual rate (percent)
    #[arg(long)]
    realistic: Option<f64>,

    /// Override the optimistic annual rate (percent)
    #[arg(long)]
    optimistic: Option<f64>,

    /// Where to write the point-by-point output
    #[arg(short, long, default_value = "projection_output.csv")]
    output: PathBuf,

    /// Write the full output as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Rows of the realistic path to print to the console
    #[arg(long, default_value_t = 24)]
    preview: usize,
}

fn build_params(args: &Args) -> anyhow::Result<ProjectionParams> {
    let mut params = match &args.request {
        Some(path) => ProjectionRequest::from_path(path)
            .with_context(|| format!("reading request {}", path.display()))?
            .into_params()?,
        None => {
            let (Some(start), Some(end)) = (args.start, args.end) else {
                bail!("either --request or both --start and --end are required");
            };
            let steps = match &args.steps {
                Some(path) => load_steps(path)
                    .with_context(|| format!("reading contribution steps {}", path.display()))?,
                None => Vec::new(),
            };
            validate_steps(&steps)?;
            warn_overlapping_steps("contribution schedule", &steps);
            ProjectionParams::new(args.initial_value.unwrap_or(0.0), start, end).with_steps(steps)
        }
    };

    if let Some(rate) = args.pessimistic {
        params.rates.pessimistic = rate;
    }
    if let Some(rate) = args.realistic {
        params.rates.realistic = rate;
    }
    if let Some(rate) = args.optimistic {
        params.rates.optimistic = rate;
    }

    Ok(params)
}

fn write_csv(output: &CombinedScenariosOutput, path: &Path) -> anyhow::Result<()> {
    let mut file = BufWriter::new(File::create(path).with_context(|| format!("creating {}", path.display()))?);

    writeln!(file, "Scenario,Date,Value,Contribution,AccumulatedContributions")?;
    for scenario in output.scenarios() {
        for point in &scenario.data_points {
            writeln!(
                file,
                "{},{},{:.8},{:.2},{:.2}",
                scenario.scenario_type,
                point.date,
                point.value,
                point.contribution_amount,
                point.accumulated_contributions,
            )?;
        }
    }

    file.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = build_params(&args)?;

    println!("Pension Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("  Initial value: {:.2}", params.initial_value);
    println!("  Contribution steps: {}", params.contribution_steps.len());
    println!("  Horizon: {} -> {}", params.start_date, params.end_date);
    for (scenario_type, rate) in params.rates.iter() {
        println!("  {:<12} {:>6.2}%", scenario_type, rate);
    }
    println!();

    let output = project(&params);
    info!(
        "Projected {} points per scenario in {:.3} ms",
        output.metadata.data_points, output.metadata.computation_time_ms
    );

    println!("{:>10} {:>14} {:>14} {:>14} {:>10}", "Date", "Pessimistic", "Realistic", "Optimistic", "Contrib");
    println!("{}", "-".repeat(68));
    let rows = output.realistic.data_points.len();
    for i in 0..rows.min(args.preview) {
        let at = |t: ScenarioType| output.scenario(t).data_points[i].value;
        let point = &output.realistic.data_points[i];
        println!(
            "{:>10} {:>14.2} {:>14.2} {:>14.2} {:>10.2}",
            point.date,
            at(ScenarioType::Pessimistic),
            at(ScenarioType::Realistic),
            at(ScenarioType::Optimistic),
            point.contribution_amount,
        );
    }
    if rows > args.preview {
        println!("... ({} more months)", rows - args.preview);
    }

    if args.json {
        let file = BufWriter::new(File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?);
        serde_json::to_writer_pretty(file, &output)?;
    } else {
        write_csv(&output, &args.output)?;
    }
    println!("\nFull results written to: {}", args.output.display());

    let summary = output.summary();
    println!("\nSummary:");
    println!("  Data points: {}", summary.data_points);
    println!("  Total contributions: {:.2}", summary.total_contributions);
    println!("  Final value (pessimistic): {:.2}", summary.final_pessimistic);
    println!("  Final value (realistic):   {:.2}", summary.final_realistic);
    println!("  Final value (optimistic):  {:.2}", summary.final_optimistic);
    println!("  Returns (realistic): {:.2}", summary.returns_realistic);
    println!("  Spread: {:.2}", summary.spread);

    Ok(())
}
