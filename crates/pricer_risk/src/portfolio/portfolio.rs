//! Portfolio aggregation over one joint simulation.
//!
//! Every revaluation simulates all distinct risk factors of the portfolio
//! once, jointly and correlated, on a grid that contains every position's
//! maturity. Positions are then valued in parallel on those shared paths,
//! so positions on the same factor see the same scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use pricer_core::types::{Currency, Date, PricingError};
use pricer_models::models::{CholeskyFactor, CorrelationMatrix, MarketParameter, MarketState};
use pricer_pricing::mc::{SimulationConfig, TimeGrid};
use pricer_pricing::valuation::{mean_and_std_error, MonteCarloEngine};
use rayon::prelude::*;
use tracing::{debug, info};

use super::builder::{correlation_matrix, PortfolioBuilder};
use super::error::PortfolioError;
use super::ids::PositionId;
use super::position::Position;

/// Pairwise correlation between two named risk factors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationSpec {
    /// First factor.
    pub a: String,
    /// Second factor.
    pub b: String,
    /// Correlation in `[-1, 1]`.
    pub rho: f64,
}

impl CorrelationSpec {
    /// Creates a pairwise correlation.
    pub fn new(a: impl Into<String>, b: impl Into<String>, rho: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            rho,
        }
    }
}

/// Valuation of one position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionValue {
    /// Position name.
    pub name: PositionId,
    /// Units held.
    pub quantity: f64,
    /// Risk factors of the contract.
    pub underlyings: Vec<String>,
    /// Present value of one unit.
    pub value: f64,
    /// Standard error of `value`.
    pub std_error: f64,
    /// Currency of the contract.
    pub currency: Currency,
    /// `quantity * value`.
    pub position_value: f64,
}

/// Valuation of the whole portfolio.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioValuation {
    /// Per-position rows, ordered by position name.
    pub positions: Vec<PositionValue>,
    /// Sum of position values.
    pub total: f64,
    /// Standard error of `total` from the per-path aggregated values.
    pub std_error: f64,
    /// Paths simulated.
    pub n_paths: usize,
    /// Base seed of the joint simulation.
    pub seed: u64,
}

/// Named positions on a set of correlated risk factors.
///
/// Built with [`PortfolioBuilder`]. Portfolios are immutable: parameter and
/// correlation overrides return new portfolios that share the untouched
/// market states.
#[derive(Clone, Debug)]
pub struct Portfolio {
    positions: BTreeMap<PositionId, Position>,
    factors: Vec<Arc<MarketState>>,
    correlations: Vec<CorrelationSpec>,
    correlation: CorrelationMatrix,
    cholesky: CholeskyFactor,
    engine: MonteCarloEngine,
}

impl Portfolio {
    /// Creates a builder.
    pub fn builder() -> PortfolioBuilder {
        PortfolioBuilder::new()
    }

    pub(crate) fn assemble(
        positions: BTreeMap<PositionId, Position>,
        factors: Vec<Arc<MarketState>>,
        correlations: Vec<CorrelationSpec>,
        engine: MonteCarloEngine,
    ) -> Result<Self, PortfolioError> {
        let correlation = correlation_matrix(&factors, &correlations)?;
        let cholesky = correlation.cholesky()?;
        debug!(
            positions = positions.len(),
            factors = factors.len(),
            correlated = !correlation.is_identity(),
            "assembled portfolio"
        );
        Ok(Self {
            positions,
            factors,
            correlations,
            correlation,
            cholesky,
            engine,
        })
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the portfolio holds no positions; never true once built.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions ordered by name.
    pub fn positions(&self) -> impl Iterator<Item = (&PositionId, &Position)> {
        self.positions.iter()
    }

    /// Position by name.
    pub fn position(&self, name: &str) -> Option<&Position> {
        self.positions.get(&PositionId::new(name))
    }

    /// Distinct risk factors, ordered by name.
    pub fn factors(&self) -> &[Arc<MarketState>] {
        &self.factors
    }

    /// Names of the distinct risk factors.
    pub fn factor_names(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.name()).collect()
    }

    /// Market state of a risk factor.
    pub fn factor(&self, name: &str) -> Option<&Arc<MarketState>> {
        self.factors.iter().find(|f| f.name() == name)
    }

    /// Correlation matrix in [`factors`](Self::factors) order.
    #[inline]
    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    /// Cholesky factor of the correlation matrix.
    #[inline]
    pub fn cholesky(&self) -> &CholeskyFactor {
        &self.cholesky
    }

    /// Simulation settings.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        self.engine.config()
    }

    /// Common pricing date.
    pub fn pricing_date(&self) -> Date {
        self.factors[0].pricing_date()
    }

    /// Joint simulation grid: pricing date to the last maturity with every
    /// maturity included.
    pub fn time_grid(&self) -> Result<TimeGrid, PricingError> {
        let pricing_date = self.pricing_date();
        let mut maturities = Vec::with_capacity(self.positions.len());
        for position in self.positions.values() {
            position.contract().check_maturity(pricing_date)?;
            maturities.push(position.contract().maturity());
        }
        let last = maturities.iter().copied().max().unwrap_or(pricing_date);
        Ok(TimeGrid::new(
            pricing_date,
            last,
            self.config().frequency(),
            &maturities,
            self.factors[0].day_count(),
        )?)
    }

    /// Sum of `quantity * present value` over all positions.
    ///
    /// # Errors
    ///
    /// The first failing position aborts the whole valuation.
    pub fn total_value(&self) -> Result<f64, PortfolioError> {
        Ok(self.valuation()?.total)
    }

    /// Per-position statistics alongside the total.
    pub fn valuation(&self) -> Result<PortfolioValuation, PortfolioError> {
        let grid = self.time_grid()?;
        let states: Vec<&MarketState> = self.factors.iter().map(Arc::as_ref).collect();
        info!(
            positions = self.positions.len(),
            factors = states.len(),
            paths = self.config().n_paths(),
            dates = grid.len(),
            "revaluing portfolio"
        );
        let paths = self
            .engine
            .simulator()
            .simulate_correlated(&states, &self.cholesky, &grid)?;

        let rows = self
            .positions
            .par_iter()
            .map(|(name, position)| {
                let values = self
                    .engine
                    .path_values(&states, &paths, &grid, position.contract())?;
                let (value, std_error) = mean_and_std_error(&values);
                let row = PositionValue {
                    name: name.clone(),
                    quantity: position.quantity(),
                    underlyings: position.underlyings().to_vec(),
                    value,
                    std_error,
                    currency: position.contract().currency(),
                    position_value: position.quantity() * value,
                };
                Ok((row, values))
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let n_paths = self.config().n_paths();
        let mut aggregated = vec![0.0; n_paths];
        for (row, values) in &rows {
            for (acc, v) in aggregated.iter_mut().zip(values) {
                *acc += row.quantity * v;
            }
        }
        let (_, std_error) = mean_and_std_error(&aggregated);
        let positions: Vec<PositionValue> = rows.into_iter().map(|(row, _)| row).collect();
        let total = positions.iter().map(|r| r.position_value).sum();

        Ok(PortfolioValuation {
            positions,
            total,
            std_error,
            n_paths,
            seed: paths.first().map_or(0, |p| p.seed()),
        })
    }

    /// Copy of the portfolio with one factor parameter overridden.
    ///
    /// # Errors
    ///
    /// - `UnknownRiskFactor` if no position references `factor`
    /// - `Pricing(InvalidMarketState)` if the new value is invalid for the
    ///   factor's dynamics
    pub fn with_factor_parameter(
        &self,
        factor: &str,
        parameter: MarketParameter,
        value: f64,
    ) -> Result<Self, PortfolioError> {
        let current = self
            .factor(factor)
            .ok_or_else(|| PortfolioError::UnknownRiskFactor(factor.to_string()))?;
        let state = Arc::new(current.with_parameter(parameter, value)?);

        let factors = self
            .factors
            .iter()
            .map(|f| {
                if f.name() == factor {
                    Arc::clone(&state)
                } else {
                    Arc::clone(f)
                }
            })
            .collect();
        let positions = self
            .positions
            .iter()
            .map(|(id, p)| {
                let position = if p.state(factor).is_some() {
                    p.with_state(&state)
                } else {
                    p.clone()
                };
                (id.clone(), position)
            })
            .collect();

        Ok(Self {
            positions,
            factors,
            correlations: self.correlations.clone(),
            correlation: self.correlation.clone(),
            cholesky: self.cholesky.clone(),
            engine: self.engine.clone(),
        })
    }

    /// Copy of the portfolio with the correlation of `a` and `b` set to
    /// `rho`, re-factorised.
    ///
    /// # Errors
    ///
    /// `UnknownRiskFactor` for an unreferenced factor, `SingularCorrelation`
    /// if the new matrix is not positive semi-definite.
    pub fn with_correlation(&self, a: &str, b: &str, rho: f64) -> Result<Self, PortfolioError> {
        let mut correlations = self.correlations.clone();
        correlations.push(CorrelationSpec::new(a, b, rho));
        Self::assemble(
            self.positions.clone(),
            self.factors.clone(),
            correlations,
            self.engine.clone(),
        )
    }

    /// Copy of the portfolio simulated with other settings.
    pub fn with_simulation(&self, config: SimulationConfig) -> Result<Self, PortfolioError> {
        let engine = MonteCarloEngine::new(config)?.with_lsm(*self.engine.lsm());
        Ok(Self {
            engine,
            ..self.clone()
        })
    }
}
