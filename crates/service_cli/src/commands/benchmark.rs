//! Benchmark command implementation
//!
//! Prices a strike ladder of European options under each model family with
//! the Fourier engine and with Monte Carlo simulation, and reports the
//! relative deviation between the two.

use pricer_core::types::{Date, PricingError};
use pricer_models::fourier::{FourierConfig, FourierMethod, FourierPricer};
use pricer_models::instruments::ContractSpec;
use pricer_models::models::{JumpParams, MarketState, ModelDynamics, ModelKind, VarianceParams};
use pricer_pricing::mc::TimeGrid;
use pricer_pricing::valuation::{fourier_value, MonteCarloEngine};
use tracing::info;

use crate::config::SimulationSection;
use crate::error::{CliError, Result};

const SPOT: f64 = 100.0;
const VOLATILITY: f64 = 0.2;
const SHORT_RATE: f64 = 0.05;

/// Settings of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkSettings {
    /// Strikes to price
    pub strikes: Vec<f64>,
    /// Puts instead of calls
    pub puts: bool,
    /// Fourier integration method
    pub method: FourierMethod,
    /// Pricing date
    pub pricing_date: Date,
    /// Maturity of every option
    pub maturity: Date,
    /// Monte Carlo settings
    pub simulation: SimulationSection,
}

/// One line of the benchmark table.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    /// Model family
    pub model: ModelKind,
    /// Strike
    pub strike: f64,
    /// Fourier value
    pub fourier: f64,
    /// Monte Carlo estimate
    pub monte_carlo: f64,
    /// Monte Carlo standard error
    pub std_error: f64,
}

impl BenchmarkRow {
    /// `(MC - Fourier) / Fourier`, zero when both are zero.
    pub fn relative_deviation(&self) -> f64 {
        if self.fourier.abs() < f64::EPSILON {
            0.0
        } else {
            (self.monte_carlo - self.fourier) / self.fourier
        }
    }

    /// Whether the deviation lies within `k` standard errors.
    pub fn within(&self, k: f64) -> bool {
        (self.monte_carlo - self.fourier).abs() <= k * self.std_error
    }
}

/// Representative dynamics per model family.
fn dynamics(kind: ModelKind) -> ModelDynamics {
    let jumps = JumpParams::new(0.5, -0.1, 0.1);
    let variance = VarianceParams::new(2.0, 0.04, 0.3, -0.5);
    match kind {
        ModelKind::GeometricBrownianMotion => ModelDynamics::GeometricBrownianMotion,
        ModelKind::JumpDiffusion => ModelDynamics::JumpDiffusion(jumps),
        ModelKind::StochasticVolatility => ModelDynamics::StochasticVolatility(variance),
        ModelKind::StochasticVolatilityJumpDiffusion => {
            ModelDynamics::StochasticVolatilityJumpDiffusion(variance, jumps)
        }
    }
}

/// Price the ladder for every model.
pub fn benchmark(settings: &BenchmarkSettings) -> Result<Vec<BenchmarkRow>> {
    if settings.strikes.is_empty() {
        return Err(CliError::InvalidArgument("no strikes given".to_string()));
    }
    let engine = MonteCarloEngine::new(settings.simulation.to_config()?)?;
    let fourier = FourierPricer::new(FourierConfig::default().with_method(settings.method))?;

    let mut rows = Vec::with_capacity(ModelKind::ALL.len() * settings.strikes.len());
    for kind in ModelKind::ALL {
        let state = MarketState::builder(kind.name())
            .pricing_date(settings.pricing_date)
            .initial_value(SPOT)
            .volatility(VOLATILITY)
            .short_rate(SHORT_RATE)
            .dynamics(dynamics(kind))
            .build()?;
        let grid = TimeGrid::new(
            settings.pricing_date,
            settings.maturity,
            engine.config().frequency(),
            &[],
            state.day_count(),
        )
        .map_err(PricingError::from)?;
        let paths = engine.simulator().simulate(&state, &grid)?;
        info!(model = kind.name(), strikes = settings.strikes.len(), "benchmarking");

        for &strike in &settings.strikes {
            let contract = if settings.puts {
                ContractSpec::european_put(state.name(), strike, settings.maturity)?
            } else {
                ContractSpec::european_call(state.name(), strike, settings.maturity)?
            };
            let exact = fourier_value(&fourier, &state, &contract)?;
            let simulated =
                engine.value_on_paths(&[&state], std::slice::from_ref(&paths), &grid, &contract)?;
            rows.push(BenchmarkRow {
                model: kind,
                strike,
                fourier: exact.value,
                monte_carlo: simulated.value,
                std_error: simulated.std_error,
            });
        }
    }
    Ok(rows)
}

/// Run the benchmark command
pub fn run(settings: &BenchmarkSettings) -> Result<()> {
    info!("Starting benchmark...");
    info!("  Method: {}", settings.method.name());
    info!("  Monte Carlo paths: {}", settings.simulation.paths);

    let rows = benchmark(settings)?;

    println!(
        "\n{:<8} {:>8} {:>10} {:>10} {:>8} {:>9}",
        "Model", "Strike", "Fourier", "MC", "SE", "Dev %"
    );
    println!("{}", "-".repeat(58));
    for row in &rows {
        println!(
            "{:<8} {:>8.2} {:>10.4} {:>10.4} {:>8.4} {:>8.2}{}",
            row.model.name(),
            row.strike,
            row.fourier,
            row.monte_carlo,
            row.std_error,
            100.0 * row.relative_deviation(),
            if row.within(3.0) { " " } else { "*" }
        );
    }
    let outside = rows.iter().filter(|r| !r.within(3.0)).count();
    println!("\n{} of {} values outside 3 standard errors", outside, rows.len());

    info!("Benchmark complete");
    Ok(())
}
