//! TOML configuration for the `portfolio` and `benchmark` commands.
//!
//! A portfolio file lists risk factors, positions on them, pairwise
//! correlations, simulation settings and the risk sweeps to run:
//!
//! ```toml
//! pricing_date = "2015-01-01"
//!
//! [simulation]
//! paths = 25000
//! seed = 42
//! frequency = "weekly"
//! antithetic = true
//!
//! [[factors]]
//! name = "gbm"
//! initial_value = 36.0
//! volatility = 0.2
//! short_rate = 0.06
//!
//! [[positions]]
//! name = "am_put_pos"
//! quantity = 3.0
//! exercise = "american"
//! payoff = "put"
//! underlyings = ["gbm"]
//! strike = 40.0
//! maturity = "2015-12-31"
//!
//! [[risk]]
//! factor = "gbm"
//! parameter = "initial_value"
//! low = 0.8
//! high = 1.2
//! points = 5
//! ```
//!
//! Path count and seed can be overridden through `PRICER_PATHS` and
//! `PRICER_SEED`; command-line flags take precedence over both.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use pricer_core::types::{Currency, Date};
use pricer_models::instruments::{ContractSpec, ExerciseStyle, Payoff};
use pricer_models::models::{JumpParams, MarketParameter, MarketState, ModelDynamics, VarianceParams};
use pricer_pricing::mc::{Frequency, SimulationConfig, VarianceFloor, DEFAULT_PATHS};
use pricer_pricing::valuation::LsmConfig;
use pricer_risk::portfolio::{Portfolio, Position};
use pricer_risk::scenarios::SweepGrid;
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Environment variable overriding the path count.
pub const PATHS_ENV: &str = "PRICER_PATHS";

/// Environment variable overriding the seed. `fresh` selects a new seed
/// for every run.
pub const SEED_ENV: &str = "PRICER_SEED";

/// `[simulation]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Number of paths
    pub paths: usize,
    /// Fixed seed; absent means a fresh seed per run
    pub seed: Option<u64>,
    /// Grid spacing: `"daily"`, `"weekly"`, `"monthly"` or
    /// `{ every_n_days = n }`
    pub frequency: Frequency,
    /// Antithetic pairing
    pub antithetic: bool,
    /// Per-step standardisation of the shocks
    pub moment_matching: bool,
    /// Euler variance floor: `"full_truncation"` or `"reflection"`
    pub variance_floor: VarianceFloor,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            paths: DEFAULT_PATHS,
            seed: None,
            frequency: Frequency::Weekly,
            antithetic: true,
            moment_matching: false,
            variance_floor: VarianceFloor::FullTruncation,
        }
    }
}

impl SimulationSection {
    /// Apply `PRICER_PATHS` and `PRICER_SEED` read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(PATHS_ENV) {
            self.paths = raw.trim().parse().map_err(|_| {
                CliError::InvalidArgument(format!("{}={} is not a path count", PATHS_ENV, raw))
            })?;
        }
        if let Some(raw) = lookup(SEED_ENV) {
            let raw = raw.trim();
            self.seed = if raw.eq_ignore_ascii_case("fresh") {
                None
            } else {
                Some(raw.parse().map_err(|_| {
                    CliError::InvalidArgument(format!("{}={} is not a seed", SEED_ENV, raw))
                })?)
            };
        }
        Ok(())
    }

    /// Validated simulation configuration.
    pub fn to_config(&self) -> Result<SimulationConfig> {
        let builder = SimulationConfig::builder()
            .n_paths(self.paths)
            .frequency(self.frequency)
            .antithetic(self.antithetic)
            .moment_matching(self.moment_matching)
            .variance_floor(self.variance_floor);
        let builder = match self.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        };
        builder
            .build()
            .map_err(|e| CliError::Config(format!("simulation: {}", e)))
    }
}

/// `[lsm]` table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LsmSection {
    /// Polynomial degree of the regression basis
    pub degree: usize,
    /// Regress on in-the-money paths only
    pub in_the_money_only: bool,
}

impl Default for LsmSection {
    fn default() -> Self {
        let lsm = LsmConfig::default();
        Self {
            degree: lsm.degree(),
            in_the_money_only: lsm.in_the_money_only(),
        }
    }
}

/// Jump parameters of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JumpSection {
    /// Arrival intensity
    pub intensity: f64,
    /// Mean log jump
    pub mean: f64,
    /// Log jump volatility
    pub volatility: f64,
}

/// Variance process parameters of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarianceSection {
    /// Mean reversion speed
    pub mean_reversion: f64,
    /// Long-run variance
    pub long_run_variance: f64,
    /// Volatility of variance
    pub vol_of_vol: f64,
    /// Asset/variance correlation
    pub correlation: f64,
}

/// One `[[factors]]` entry. The model family follows from which of
/// `jumps` and `variance` are present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactorSection {
    /// Risk factor name
    pub name: String,
    /// Spot level
    pub initial_value: f64,
    /// Volatility (initial volatility under stochastic variance)
    pub volatility: f64,
    /// Continuously compounded short rate
    pub short_rate: f64,
    /// ISO currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Jump component
    #[serde(default)]
    pub jumps: Option<JumpSection>,
    /// Stochastic variance component
    #[serde(default)]
    pub variance: Option<VarianceSection>,
}

impl FactorSection {
    fn dynamics(&self) -> ModelDynamics {
        let jumps = self
            .jumps
            .map(|j| JumpParams::new(j.intensity, j.mean, j.volatility));
        let variance = self.variance.map(|v| {
            VarianceParams::new(v.mean_reversion, v.long_run_variance, v.vol_of_vol, v.correlation)
        });
        match (variance, jumps) {
            (None, None) => ModelDynamics::GeometricBrownianMotion,
            (None, Some(j)) => ModelDynamics::JumpDiffusion(j),
            (Some(v), None) => ModelDynamics::StochasticVolatility(v),
            (Some(v), Some(j)) => ModelDynamics::StochasticVolatilityJumpDiffusion(v, j),
        }
    }

    /// Market state of this factor as of `pricing_date`.
    pub fn to_state(&self, pricing_date: Date) -> Result<MarketState> {
        let mut builder = MarketState::builder(self.name.as_str())
            .pricing_date(pricing_date)
            .initial_value(self.initial_value)
            .volatility(self.volatility)
            .short_rate(self.short_rate)
            .dynamics(self.dynamics());
        if let Some(code) = &self.currency {
            let currency: Currency = code
                .parse()
                .map_err(|e| CliError::Config(format!("factor {}: {}", self.name, e)))?;
            builder = builder.currency(currency);
        }
        Ok(builder.build()?)
    }
}

/// Exercise style as written in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseSetting {
    /// At maturity only
    #[default]
    European,
    /// At every grid date
    American,
}

/// Payoff kind as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffSetting {
    /// Vanilla call
    Call,
    /// Vanilla put
    Put,
    /// Best-of call
    MaxCall,
    /// Worst-of put
    MinPut,
    /// Weighted basket call
    BasketCall,
    /// Weighted basket put
    BasketPut,
}

/// One `[[positions]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionSection {
    /// Position name
    pub name: String,
    /// Number of contracts
    pub quantity: f64,
    /// Exercise style
    #[serde(default)]
    pub exercise: ExerciseSetting,
    /// Payoff kind
    pub payoff: PayoffSetting,
    /// Risk factors in payoff order
    pub underlyings: Vec<String>,
    /// Strike
    pub strike: f64,
    /// Basket weights, aligned with `underlyings`
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// Maturity date
    pub maturity: Date,
}

impl PositionSection {
    /// Contract of this position.
    pub fn to_contract(&self) -> Result<ContractSpec> {
        let strike = self.strike;
        let weights = || {
            self.weights.clone().ok_or_else(|| {
                CliError::Config(format!("position {}: basket payoff needs weights", self.name))
            })
        };
        let payoff = match self.payoff {
            PayoffSetting::Call => Payoff::Call { strike },
            PayoffSetting::Put => Payoff::Put { strike },
            PayoffSetting::MaxCall => Payoff::MaxCall { strike },
            PayoffSetting::MinPut => Payoff::MinPut { strike },
            PayoffSetting::BasketCall => Payoff::BasketCall {
                weights: weights()?,
                strike,
            },
            PayoffSetting::BasketPut => Payoff::BasketPut {
                weights: weights()?,
                strike,
            },
        };
        let exercise = match self.exercise {
            ExerciseSetting::European => ExerciseStyle::European,
            ExerciseSetting::American => ExerciseStyle::American,
        };
        Ok(ContractSpec::new(exercise, self.underlyings.clone(), self.maturity, payoff)?)
    }
}

/// One `[[correlations]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrelationSection {
    /// First factor
    pub a: String,
    /// Second factor
    pub b: String,
    /// Correlation
    pub rho: f64,
}

/// One `[[risk]]` entry: an evenly spaced sweep of one parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskSection {
    /// Risk factor to perturb
    pub factor: String,
    /// Parameter name, e.g. `initial_value` or `vol`
    pub parameter: String,
    /// Lowest grid value
    pub low: f64,
    /// Highest grid value
    pub high: f64,
    /// Number of grid points
    pub points: usize,
    /// Whether `low` and `high` are multiples of the base value
    #[serde(default = "default_relative")]
    pub relative: bool,
}

fn default_relative() -> bool {
    true
}

impl RiskSection {
    /// Parsed parameter.
    pub fn parameter(&self) -> Result<MarketParameter> {
        self.parameter.parse().map_err(CliError::Config)
    }

    /// Sweep grid.
    pub fn grid(&self) -> Result<SweepGrid> {
        let grid = if self.relative {
            SweepGrid::relative_range(self.low, self.high, self.points)
        } else {
            SweepGrid::absolute_range(self.low, self.high, self.points)
        };
        grid.ok_or_else(|| {
            CliError::Config(format!(
                "risk sweep on {}: need low <= high and at least 2 points, got [{}, {}] x {}",
                self.factor, self.low, self.high, self.points
            ))
        })
    }
}

/// Parsed portfolio file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioFile {
    /// Pricing date shared by every factor
    pub pricing_date: Date,
    /// Simulation settings
    #[serde(default)]
    pub simulation: SimulationSection,
    /// Regression settings for American positions
    #[serde(default)]
    pub lsm: LsmSection,
    /// Risk factors
    pub factors: Vec<FactorSection>,
    /// Positions
    pub positions: Vec<PositionSection>,
    /// Pairwise correlations; unlisted pairs are independent
    #[serde(default)]
    pub correlations: Vec<CorrelationSection>,
    /// Risk sweeps to report
    #[serde(default)]
    pub risk: Vec<RiskSection>,
}

impl PortfolioFile {
    /// Read and parse a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Assemble the portfolio.
    ///
    /// Positions share one `Arc<MarketState>` per factor.
    pub fn build_portfolio(&self) -> Result<Portfolio> {
        let mut states: BTreeMap<&str, Arc<MarketState>> = BTreeMap::new();
        for factor in &self.factors {
            let state = Arc::new(factor.to_state(self.pricing_date)?);
            if states.insert(factor.name.as_str(), state).is_some() {
                return Err(CliError::Config(format!("factor {} defined twice", factor.name)));
            }
        }

        let mut builder = Portfolio::builder()
            .simulation(self.simulation.to_config()?)
            .lsm(LsmConfig::new(self.lsm.degree, self.lsm.in_the_money_only)?);
        for entry in &self.positions {
            let contract = entry.to_contract()?;
            let position_states = contract
                .underlyings()
                .iter()
                .map(|name| {
                    states.get(name.as_str()).cloned().ok_or_else(|| {
                        CliError::Config(format!(
                            "position {} references undefined factor {}",
                            entry.name, name
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let position = Position::new(entry.quantity, contract, position_states)?;
            builder = builder.add_position(entry.name.as_str(), position);
        }
        for c in &self.correlations {
            builder = builder.correlation(c.a.as_str(), c.b.as_str(), c.rho);
        }
        Ok(builder.build()?)
    }
}

impl std::str::FromStr for PortfolioFile {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
