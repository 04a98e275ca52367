//! Grid twin entry point: CLI wiring and config-driven engine construction.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::{Cli, Command, SimulateArgs};
use grid_twin::config::TwinConfig;
use grid_twin::io::export::export_csv;
use grid_twin::logging::init_tracing;
use grid_twin::sim::engine::Engine;
use grid_twin::sim::kpi::HealthReport;
use grid_twin::sim::schedule::FaultSchedule;

/// Loads config: `--config` takes priority, then `--preset`, then the default.
fn load_config(cli: &Cli) -> Result<TwinConfig> {
    let cfg = if let Some(ref path) = cli.config {
        TwinConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        TwinConfig::from_preset(name)?
    } else {
        TwinConfig::default()
    };
    Ok(cfg)
}

fn simulate(cfg: &TwinConfig, args: SimulateArgs) -> Result<()> {
    if !(args.dt > 0.0 && args.dt.is_finite()) {
        anyhow::bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }
    let schedule: FaultSchedule = args.faults.into_iter().collect();
    let mut engine = Engine::from_config(cfg);
    let records = engine
        .run(args.ticks, args.dt, &schedule)
        .context("simulation rejected a scripted fault")?;

    if !args.quiet {
        for r in &records {
            println!("t={:>4} {}", r.tick, r.status);
        }
        println!();
    }

    println!("{}", HealthReport::from_records(&records));

    if let Some(ref path) = args.telemetry_out {
        export_csv(&records, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Telemetry written to {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(cfg: &TwinConfig) -> Result<()> {
    use std::sync::Arc;
    use std::time::Duration;

    let addr = cfg.server.socket_addr()?;
    let state = Arc::new(grid_twin::api::AppState::new(Engine::from_config(cfg)));
    let tick = Duration::from_millis(cfg.simulation.tick_ms);

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(grid_twin::api::serve(state, addr, tick))
        .with_context(|| format!("server on {addr} failed"))
}

#[cfg(not(feature = "api"))]
fn serve(_cfg: &TwinConfig) -> Result<()> {
    anyhow::bail!("grid-twin was built without the `api` feature")
}

#[cfg(feature = "tui")]
fn tui(cfg: &TwinConfig) -> Result<()> {
    grid_twin::tui::run(cfg).context("terminal dashboard failed")
}

#[cfg(not(feature = "tui"))]
fn tui(_cfg: &TwinConfig) -> Result<()> {
    anyhow::bail!("grid-twin was built without the `tui` feature")
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = load_config(&cli)?;

    if let Some(seed) = cli.seed {
        cfg.simulation.seed = seed;
    }
    if let Command::Serve(ref args) = cli.command {
        if let Some(ref host) = args.host {
            cfg.server.host = host.clone();
        }
        if let Some(port) = args.port {
            cfg.server.port = port;
        }
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        anyhow::bail!("invalid configuration ({} error(s))", errors.len());
    }

    info!(
        seed = cfg.simulation.seed,
        assets = cfg.assets.len(),
        homes = cfg.homes.len(),
        "configuration loaded"
    );

    match cli.command {
        Command::Serve(_) => serve(&cfg),
        Command::Simulate(args) => simulate(&cfg, args),
        Command::Tui => tui(&cfg),
    }
}

fn main() {
    let cli = Cli::parse();
    // The TUI owns the terminal, so logs would corrupt the screen.
    if !matches!(cli.command, Command::Tui) {
        init_tracing(cli.log_json);
    }

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
