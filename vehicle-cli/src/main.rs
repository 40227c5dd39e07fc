//! Vehicle State CLI Application
//!
//! Command-line front end for the vehicle-state library. It replays a
//! scenario of switch and value writes and reports:
//! - Which writes changed state and which were no-ops
//! - Which changes would be handed to the bus transport
//! - The final snapshot of every slot

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use vehicle_state::{Switch, Value};

mod config;
mod report;

/// Vehicle State - Replay switch/value scenarios
#[derive(Parser, Debug)]
#[command(name = "vehicle-cli")]
#[command(about = "Replay vehicle switch/value scenarios and report state changes", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a TOML scenario file
    #[arg(short, long, value_name = "FILE", required_unless_present = "list")]
    scenario: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// List all switch and value slots, then exit
    #[arg(long)]
    list: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Vehicle State CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using vehicle-state library v{}", vehicle_state::VERSION);

    if args.list {
        print!("{}", slot_listing());
        return Ok(());
    }

    if let Some(scenario_path) = &args.scenario {
        scenario_mode(scenario_path, &args)?;
    }

    Ok(())
}

/// Scenario mode - load, run, render, write
fn scenario_mode(scenario_path: &PathBuf, args: &Args) -> Result<()> {
    log::info!("Loading scenario from: {:?}", scenario_path);
    let scenario = config::load_scenario(scenario_path)?;
    log::debug!("Scenario loaded: {} steps", scenario.steps.len());

    let report = report::run_scenario(&scenario)?;

    let rendered = match args.format {
        ReportFormat::Text => report::render_text(&report)?,
        ReportFormat::Json => report::render_json(&report)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Table of every slot name and index
fn slot_listing() -> String {
    let mut out = String::from("Switches:\n");
    for switch in Switch::ALL {
        out.push_str(&format!("  [{:>2}] {}\n", switch.index(), switch));
    }
    out.push_str("Values:\n");
    for value in Value::ALL {
        out.push_str(&format!("  [{:>2}] {}\n", value.index(), value));
    }
    out
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
