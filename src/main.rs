//! u-reflow CLI - reflow a production schedule and explain every move.

mod scenarios;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use u_reflow::models::{ReflowInput, ReflowOutput};
use u_reflow::{logging, validate, validate_input, ReflowConfig, ReflowEngine, ReflowKpi};

use scenarios::Scenario;

#[derive(Parser)]
#[command(name = "u-reflow", version)]
#[command(about = "Reflow manufacturing work orders around delays, shifts, and maintenance", long_about = None)]
struct Cli {
    /// Reflow configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reflow a bundled scenario
    Scenario {
        /// Scenario name
        #[arg(value_enum)]
        name: Scenario,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reflow an input file
    Run {
        /// Input file (JSON)
        input: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check an input file without reflowing it
    Check {
        /// Input file (JSON)
        input: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    #[serde(flatten)]
    output: &'a ReflowOutput,
    kpi: &'a ReflowKpi,
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Scenario { name, json } => {
            let input = name.input()?;
            info!(scenario = ?name, "running bundled scenario");
            if !json {
                println!("=== {} ===", name.title());
            }
            execute(&input, config, json)
        }
        Commands::Run { input, json } => {
            let input = read_input(&input)?;
            execute(&input, config, json)
        }
        Commands::Check { input } => {
            let input = read_input(&input)?;
            preflight(&input)?;
            println!(
                "OK: {} work orders, {} work centers",
                input.work_orders.len(),
                input.work_centers.len()
            );
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ReflowConfig> {
    let Some(path) = path else {
        return Ok(ReflowConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = ReflowConfig::from_json(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn read_input(path: &Path) -> Result<ReflowInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading input {}", path.display()))?;
    let input = ReflowInput::from_json(&text)
        .with_context(|| format!("parsing input {}", path.display()))?;
    Ok(input)
}

fn preflight(input: &ReflowInput) -> Result<()> {
    if let Err(errors) = validate_input(input) {
        for error in &errors {
            eprintln!("  [{:?}] {}", error.kind, error.message);
        }
        bail!("input has {} problem(s)", errors.len());
    }
    Ok(())
}

fn execute(input: &ReflowInput, config: ReflowConfig, json: bool) -> Result<()> {
    preflight(input)?;

    let output = ReflowEngine::new().with_config(config).reflow(input)?;
    validate(input, &output.updated_work_orders)
        .context("reflow result failed constraint validation")?;
    let kpi = ReflowKpi::calculate(input, &output)?;

    if json {
        let report = Report {
            output: &output,
            kpi: &kpi,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&output, &kpi);
    }
    Ok(())
}

fn print_report(output: &ReflowOutput, kpi: &ReflowKpi) {
    println!("Updated work orders ({})", output.updated_work_orders.len());
    for wo in &output.updated_work_orders {
        println!(
            "  {} | {} | {} -> {}{}",
            wo.doc_id,
            wo.data.work_center_id,
            wo.data.start_date,
            wo.data.end_date,
            if wo.is_maintenance() { " | maintenance" } else { "" },
        );
    }

    println!("Changes ({})", output.changes.len());
    for change in &output.changes {
        println!(
            "  {}: start {} -> {} ({:+} min), end {} -> {} ({:+} min)",
            change.work_order_doc_id,
            change.old_start_date,
            change.new_start_date,
            change.delta_start_minutes,
            change.old_end_date,
            change.new_end_date,
            change.delta_end_minutes,
        );
    }

    println!("Explanations");
    for (id, lines) in &output.explanation_by_work_order_id {
        println!("  {id}:");
        for line in lines {
            println!("    - {line}");
        }
    }

    println!("KPI");
    println!("  Changed orders: {}", kpi.changed_orders);
    println!("  Total end delay: {} min", kpi.total_end_delay_minutes);
    println!("  Max end delay: {} min", kpi.max_end_delay_minutes);
    if let Some(end) = kpi.makespan_end {
        println!("  Makespan end: {}", end.to_rfc3339());
    }
    if !kpi.late_manufacturing_orders.is_empty() {
        println!("  Late MOs: {}", kpi.late_manufacturing_orders.join(", "));
    }
    println!("  On-time rate: {:.1}%", kpi.on_time_rate * 100.0);
}
