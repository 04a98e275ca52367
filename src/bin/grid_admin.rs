//! Admin console for injecting faults into a running grid twin.

use std::io;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use grid_twin::console::{Console, HttpClient};
use grid_twin::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "grid-admin", version, about = "Grid twin admin control panel")]
struct Cli {
    /// Base URL of the grid-twin server
    #[arg(long, default_value = "http://localhost:5000")]
    url: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn run(cli: Cli) -> Result<()> {
    let client = HttpClient::new(&cli.url)?;
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), client);
    console.run().context("console I/O failed")?;
    println!("\nExiting...");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
