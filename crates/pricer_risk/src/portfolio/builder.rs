//! Portfolio builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use pricer_models::models::{CorrelationMatrix, MarketState};
use pricer_pricing::mc::SimulationConfig;
use pricer_pricing::valuation::{LsmConfig, MonteCarloEngine};

use super::error::PortfolioError;
use super::ids::PositionId;
use super::portfolio::{CorrelationSpec, Portfolio};
use super::position::Position;

/// Builder for [`Portfolio`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::types::Date;
/// use pricer_models::instruments::ContractSpec;
/// use pricer_models::models::MarketState;
/// use pricer_pricing::mc::SimulationConfig;
/// use pricer_risk::portfolio::{PortfolioBuilder, Position};
///
/// let date = Date::from_ymd(2015, 1, 1).unwrap();
/// let state = |name: &str| {
///     Arc::new(MarketState::builder(name).pricing_date(date).initial_value(36.0).volatility(0.2).build().unwrap())
/// };
/// let (gbm, jd) = (state("gbm"), state("jd"));
/// let maturity = Date::from_ymd(2015, 12, 31).unwrap();
///
/// let portfolio = PortfolioBuilder::new()
///     .add_position("call", Position::new(1.0, ContractSpec::european_call("gbm", 40.0, maturity).unwrap(), vec![gbm]).unwrap())
///     .add_position("put", Position::new(2.0, ContractSpec::european_put("jd", 40.0, maturity).unwrap(), vec![jd]).unwrap())
///     .correlation("gbm", "jd", 0.9)
///     .simulation(SimulationConfig::builder().n_paths(1_000).seed(1).build().unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(portfolio.len(), 2);
/// assert_eq!(portfolio.factor_names(), vec!["gbm", "jd"]);
/// ```
#[derive(Debug, Default)]
pub struct PortfolioBuilder {
    positions: Vec<(PositionId, Position)>,
    correlations: Vec<CorrelationSpec>,
    config: Option<SimulationConfig>,
    lsm: LsmConfig,
}

impl PortfolioBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named position.
    pub fn add_position(mut self, name: impl Into<PositionId>, position: Position) -> Self {
        self.positions.push((name.into(), position));
        self
    }

    /// Adds several named positions.
    pub fn add_positions<I, N>(mut self, positions: I) -> Self
    where
        I: IntoIterator<Item = (N, Position)>,
        N: Into<PositionId>,
    {
        self.positions
            .extend(positions.into_iter().map(|(n, p)| (n.into(), p)));
        self
    }

    /// Sets the correlation between two risk factors; later entries for
    /// the same pair win.
    pub fn correlation(mut self, a: impl Into<String>, b: impl Into<String>, rho: f64) -> Self {
        self.correlations.push(CorrelationSpec::new(a, b, rho));
        self
    }

    /// Sets the simulation settings (defaults to [`SimulationConfig::default`]).
    pub fn simulation(mut self, config: SimulationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the early-exercise regression settings.
    pub fn lsm(mut self, lsm: LsmConfig) -> Self {
        self.lsm = lsm;
        self
    }

    /// Builds the portfolio.
    ///
    /// # Errors
    ///
    /// - `EmptyPortfolio` without positions
    /// - `DuplicatePosition` for repeated names
    /// - `ConflictingMarketState` if one factor name carries two states
    /// - `PricingDateMismatch` if the states disagree on the pricing date
    /// - `UnknownRiskFactor` for a correlation on an unreferenced factor
    /// - `SingularCorrelation` if the matrix is not positive semi-definite
    pub fn build(self) -> Result<Portfolio, PortfolioError> {
        if self.positions.is_empty() {
            return Err(PortfolioError::EmptyPortfolio);
        }

        let mut positions = BTreeMap::new();
        for (id, position) in self.positions {
            if positions.contains_key(&id) {
                return Err(PortfolioError::DuplicatePosition(id.to_string()));
            }
            positions.insert(id, position);
        }

        let mut factors: Vec<Arc<MarketState>> = Vec::new();
        for position in positions.values() {
            for state in position.states() {
                match factors.iter().find(|f| f.name() == state.name()) {
                    Some(existing) if existing.as_ref() != state.as_ref() => {
                        return Err(PortfolioError::ConflictingMarketState(state.name().to_string()));
                    }
                    Some(_) => {}
                    None => factors.push(Arc::clone(state)),
                }
            }
        }
        factors.sort_by(|a, b| a.name().cmp(b.name()));

        let pricing_date = factors[0].pricing_date();
        if let Some(f) = factors.iter().find(|f| f.pricing_date() != pricing_date) {
            return Err(PortfolioError::PricingDateMismatch {
                factor: f.name().to_string(),
                expected: pricing_date.to_string(),
                found: f.pricing_date().to_string(),
            });
        }

        let engine = MonteCarloEngine::new(self.config.unwrap_or_default())?.with_lsm(self.lsm);
        Portfolio::assemble(positions, factors, self.correlations, engine)
    }
}

/// Correlation matrix over `factors` from pairwise specifications.
pub(crate) fn correlation_matrix(
    factors: &[Arc<MarketState>],
    specs: &[CorrelationSpec],
) -> Result<CorrelationMatrix, PortfolioError> {
    let index = |name: &str| {
        factors
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| PortfolioError::UnknownRiskFactor(name.to_string()))
    };
    let pairs = specs
        .iter()
        .map(|spec| Ok((index(&spec.a)?, index(&spec.b)?, spec.rho)))
        .collect::<Result<Vec<_>, PortfolioError>>()?;
    Ok(CorrelationMatrix::from_pairs(factors.len(), &pairs)?)
}
