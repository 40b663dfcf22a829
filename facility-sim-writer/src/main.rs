// Facility Sim Writer - Periodic simulation writer
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Facility Sim Writer
//!
//! Runs a facility simulation at simulated timestamps and streams every
//! tick's values to a CSV file or stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Machine-shop preset, JSON lines on stdout, one tick per second
//! facility-sim-writer --frequency 1
//!
//! # Settings file, fixed seed, stop after 1000 ticks
//! facility-sim-writer --settings run.json --seed 42 --max-ticks 1000
//! ```

mod config;
mod error;
mod runner;
mod sink;

use clap::Parser;
use config::RunSettings;
use error::WriterError;
use facility_sim::{from_entropy, seeded, SimulationModel};
use runner::Runner;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Facility simulation writer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Seed for reproducible runs (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks (overrides the settings file)
    #[arg(short, long)]
    max_ticks: Option<u64>,

    /// Real seconds between ticks (overrides the settings file)
    #[arg(short, long)]
    frequency: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    // Logs go to stderr so stdout stays clean for the JSON lines sink
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Facility Sim Writer v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), WriterError> {
    let mut settings = match &args.settings {
        Some(path) => RunSettings::from_file(path)?,
        None => {
            info!("No settings file specified, using defaults");
            RunSettings::default()
        }
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if args.max_ticks.is_some() {
        settings.max_ticks = args.max_ticks;
    }
    if let Some(frequency) = args.frequency {
        settings.frequency = frequency;
    }
    settings.validate()?;

    let catalog = settings.load_catalog()?;
    let model = match settings.seed {
        Some(seed) => SimulationModel::new(catalog, seeded(seed))?,
        None => SimulationModel::new(catalog, from_entropy())?,
    };

    let sink = sink::from_settings(&settings.sink)?;
    let mut runner = Runner::new(model, sink, &settings)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    runner.run_until(shutdown).await?;
    info!(
        "Wrote {} ticks, next simulated time {:.3}",
        runner.model().tick_count(),
        runner.current_time()
    );
    Ok(())
}
