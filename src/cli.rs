//! Command-line interface for the `grid-twin` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grid_twin::config::TwinConfig;
use grid_twin::sim::schedule::ScheduledFault;

#[derive(Parser, Debug)]
#[command(
    name = "grid-twin",
    version,
    about = "Power-grid digital twin with fault injection"
)]
pub struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, global = true, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset
    #[arg(long, global = true, value_parser = clap::builder::PossibleValuesParser::new(TwinConfig::PRESETS.iter().copied()))]
    pub preset: Option<String>,

    /// Override the random seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the live twin and its HTTP API
    Serve(ServeArgs),
    /// Run a fixed number of ticks offline and print a health report
    Simulate(SimulateArgs),
    /// Open the terminal dashboard
    Tui,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of ticks to run
    #[arg(long, default_value_t = 60)]
    pub ticks: usize,

    /// Seconds between ticks
    #[arg(long, default_value_t = 1.0)]
    pub dt: f64,

    /// Scripted fault, `<key>:<fault>@<tick>[+<secs>]`, e.g. `grid_2:dip@5+10`
    #[arg(long = "fault", value_name = "SCRIPT")]
    pub faults: Vec<ScheduledFault>,

    /// Export per-asset tick rows to CSV
    #[arg(long)]
    pub telemetry_out: Option<PathBuf>,

    /// Only print the health report
    #[arg(long, short)]
    pub quiet: bool,
}
