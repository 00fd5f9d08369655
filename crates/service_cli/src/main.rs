//! Pricer CLI - Command Line Driver for the Valuation Core
//!
//! # Commands
//!
//! - `pricer benchmark` - Compare Fourier and Monte Carlo values of a
//!   strike ladder under every model family
//! - `pricer portfolio <file>` - Value a portfolio from a TOML file and run
//!   its risk sweeps
//!
//! Path count and seed come from the command line, then `PRICER_PATHS` and
//! `PRICER_SEED`, then the configuration file. Log output is controlled by
//! `RUST_LOG`.
//!
//! # Architecture
//!
//! As the service layer, this crate only parses input, calls into
//! `pricer_models`, `pricer_pricing` and `pricer_risk`, and formats the
//! results.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pricer_core::types::Date;
use pricer_models::fourier::FourierMethod;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use error::Result;

use commands::benchmark::BenchmarkSettings;
use commands::portfolio::OutputFormat;
use config::{PortfolioFile, SimulationSection};

/// Pricer CLI
#[derive(Parser)]
#[command(name = "pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of Monte Carlo paths (overrides PRICER_PATHS and the file)
    #[arg(short = 'n', long, global = true)]
    paths: Option<usize>,

    /// Fixed seed (overrides PRICER_SEED and the file)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    /// Lewis single-integral form
    Lewis,
    /// Carr-Madan damped call transform
    CarrMadan,
}

impl From<MethodArg> for FourierMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Lewis => FourierMethod::Lewis,
            MethodArg::CarrMadan => FourierMethod::carr_madan(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare Fourier and Monte Carlo values for every model family
    Benchmark {
        /// Strikes, comma separated
        #[arg(short = 'k', long, value_delimiter = ',', default_value = "80,90,100,110,120")]
        strikes: Vec<f64>,

        /// Price puts instead of calls
        #[arg(long)]
        puts: bool,

        /// Fourier integration method
        #[arg(short, long, value_enum, default_value = "lewis")]
        method: MethodArg,

        /// Pricing date (YYYY-MM-DD)
        #[arg(long, default_value = "2015-01-01", value_parser = parse_date)]
        pricing_date: Date,

        /// Maturity (YYYY-MM-DD)
        #[arg(long, default_value = "2015-12-31", value_parser = parse_date)]
        maturity: Date,
    },

    /// Value a portfolio and run its risk sweeps
    Portfolio {
        /// Portfolio file
        #[arg(default_value = "pricer.toml")]
        file: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn parse_date(s: &str) -> std::result::Result<Date, String> {
    Date::parse(s).map_err(|e| e.to_string())
}

/// Environment first, then command-line flags.
fn override_simulation(cli: &Cli, section: &mut SimulationSection) -> Result<()> {
    section.apply_env_overrides(|key| std::env::var(key).ok())?;
    if let Some(paths) = cli.paths {
        section.paths = paths;
    }
    if let Some(seed) = cli.seed {
        section.seed = Some(seed);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match &cli.command {
        Commands::Benchmark {
            strikes,
            puts,
            method,
            pricing_date,
            maturity,
        } => {
            let mut simulation = SimulationSection {
                paths: 50_000,
                seed: Some(42),
                ..SimulationSection::default()
            };
            override_simulation(&cli, &mut simulation)?;
            let settings = BenchmarkSettings {
                strikes: strikes.clone(),
                puts: *puts,
                method: (*method).into(),
                pricing_date: *pricing_date,
                maturity: *maturity,
                simulation,
            };
            commands::benchmark::run(&settings).context("benchmark failed")?;
        }
        Commands::Portfolio { file, format } => {
            let format: OutputFormat = format.parse()?;
            let mut portfolio = PortfolioFile::load(file)
                .with_context(|| format!("cannot load portfolio {}", file.display()))?;
            override_simulation(&cli, &mut portfolio.simulation)?;
            commands::portfolio::run(file, &portfolio, format)
                .with_context(|| format!("portfolio {} failed", file.display()))?;
        }
    }
    Ok(())
}
