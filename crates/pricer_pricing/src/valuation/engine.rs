//! Valuation entry points.

use std::sync::Arc;

use pricer_core::types::PricingError;
use pricer_models::fourier::{FourierMethod, FourierPricer};
use pricer_models::instruments::{ContractSpec, ExerciseStyle};
use pricer_models::models::{CorrelationMatrix, MarketState};
use tracing::info;

use super::american::{self, LsmConfig};
use super::european;
use super::result::{ValuationInputs, ValuationMethod, ValuationResult};
use super::view::ContractPaths;
use crate::mc::{PathCache, PathSet, PathSimulator, SimulationConfig, TimeGrid};

/// Monte Carlo valuation of European and American contracts on one or
/// several correlated underlyings.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::Date;
/// use pricer_models::instruments::ContractSpec;
/// use pricer_models::models::MarketState;
/// use pricer_pricing::mc::SimulationConfig;
/// use pricer_pricing::valuation::MonteCarloEngine;
///
/// let state = MarketState::builder("gbm")
///     .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
///     .initial_value(100.0)
///     .volatility(0.2)
///     .short_rate(0.01)
///     .build()
///     .unwrap();
/// let put = ContractSpec::european_put("gbm", 100.0, Date::from_ymd(2015, 3, 31).unwrap()).unwrap();
///
/// let config = SimulationConfig::builder().n_paths(20_000).seed(42).antithetic(true).build().unwrap();
/// let engine = MonteCarloEngine::new(config).unwrap();
/// let result = engine.present_value(&state, &put).unwrap();
/// assert!((result.value - 3.81).abs() < 0.2);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloEngine {
    simulator: PathSimulator,
    lsm: LsmConfig,
    cache: Option<Arc<PathCache>>,
}

impl MonteCarloEngine {
    /// Engine with the default regression settings and no path cache.
    pub fn new(config: SimulationConfig) -> Result<Self, PricingError> {
        Ok(Self {
            simulator: PathSimulator::new(config)?,
            lsm: LsmConfig::default(),
            cache: None,
        })
    }

    /// Replace the regression settings.
    pub fn with_lsm(mut self, lsm: LsmConfig) -> Self {
        self.lsm = lsm;
        self
    }

    /// Reuse fixed-seed simulations through `cache`.
    pub fn with_cache(mut self, cache: Arc<PathCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Simulation settings.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        self.simulator.config()
    }

    /// Regression settings.
    #[inline]
    pub fn lsm(&self) -> &LsmConfig {
        &self.lsm
    }

    /// Path simulator.
    #[inline]
    pub fn simulator(&self) -> &PathSimulator {
        &self.simulator
    }

    /// Value a contract on a single underlying.
    pub fn present_value(&self, state: &MarketState, contract: &ContractSpec) -> Result<ValuationResult, PricingError> {
        self.present_value_correlated(&[state], &CorrelationMatrix::identity(1), contract)
    }

    /// Value a contract on the risk factors in `states`, jointly simulated
    /// with `correlation`.
    ///
    /// The grid runs from the common pricing date to maturity at the
    /// configured frequency. Cash flows are discounted on the first
    /// underlying's curve.
    ///
    /// # Errors
    ///
    /// - `UnknownRiskFactor` if the contract names a factor not in `states`
    /// - `InvalidContract` if the maturity is not after the pricing date
    /// - `SingularCorrelation` if `correlation` cannot be factorised
    /// - `InvalidConfig` for mismatched dimensions or pricing dates
    pub fn present_value_correlated(
        &self,
        states: &[&MarketState],
        correlation: &CorrelationMatrix,
        contract: &ContractSpec,
    ) -> Result<ValuationResult, PricingError> {
        let first = states
            .first()
            .ok_or_else(|| PricingError::InvalidConfig("no market states supplied".to_string()))?;
        if let Some(name) = contract
            .underlyings()
            .iter()
            .find(|name| !states.iter().any(|s| s.name() == name.as_str()))
        {
            return Err(PricingError::UnknownRiskFactor(name.clone()));
        }
        contract.check_maturity(first.pricing_date())?;

        let grid = TimeGrid::new(
            first.pricing_date(),
            contract.maturity(),
            self.config().frequency(),
            &[],
            first.day_count(),
        )?;
        let cholesky = correlation.cholesky()?;
        let paths = match &self.cache {
            Some(cache) => cache.get_or_simulate(&self.simulator, states, &cholesky, &grid)?,
            None => Arc::new(self.simulator.simulate_correlated(states, &cholesky, &grid)?),
        };
        self.value_on_paths(states, &paths, &grid, contract)
    }

    /// Value a contract on already simulated paths.
    ///
    /// `states` must contain every underlying of the contract; `paths` are
    /// the joint simulation on `grid`, whose dates include the maturity.
    pub fn value_on_paths(
        &self,
        states: &[&MarketState],
        paths: &[PathSet],
        grid: &TimeGrid,
        contract: &ContractSpec,
    ) -> Result<ValuationResult, PricingError> {
        let values = self.path_values(states, paths, grid, contract)?;
        let method = match contract.exercise() {
            ExerciseStyle::European => ValuationMethod::MonteCarlo,
            ExerciseStyle::American => ValuationMethod::LeastSquaresMonteCarlo,
        };
        let inputs = ValuationInputs {
            method,
            underlyings: contract.underlyings().to_vec(),
            pricing_date: grid.first_date(),
            maturity: contract.maturity(),
            n_paths: values.len(),
            n_times: grid.len(),
            seed: paths.first().map(PathSet::seed),
        };
        let result = ValuationResult::from_path_values(&values, inputs);
        info!(
            method = %result.inputs.method,
            underlyings = ?result.inputs.underlyings,
            value = result.value,
            std_error = result.std_error,
            "valued contract"
        );
        Ok(result)
    }

    /// Discounted per-path values of a contract on simulated paths.
    pub fn path_values(
        &self,
        states: &[&MarketState],
        paths: &[PathSet],
        grid: &TimeGrid,
        contract: &ContractSpec,
    ) -> Result<Vec<f64>, PricingError> {
        let first = &contract.underlyings()[0];
        let discounting = states
            .iter()
            .find(|s| s.name() == first.as_str())
            .ok_or_else(|| PricingError::UnknownRiskFactor(first.clone()))?;
        let view = ContractPaths::new(contract, paths, grid)?;
        match contract.exercise() {
            ExerciseStyle::European => european::path_values(&view, discounting),
            ExerciseStyle::American => american::path_values(&view, discounting, &self.lsm),
        }
    }
}

/// Fourier value of a European vanilla contract as a [`ValuationResult`].
pub fn fourier_value(
    pricer: &FourierPricer,
    state: &MarketState,
    contract: &ContractSpec,
) -> Result<ValuationResult, PricingError> {
    let value = pricer.present_value(state, contract)?;
    let method = match pricer.config().method {
        FourierMethod::Lewis => ValuationMethod::FourierLewis,
        FourierMethod::CarrMadan { .. } => ValuationMethod::FourierCarrMadan,
    };
    Ok(ValuationResult::exact(
        value,
        ValuationInputs {
            method,
            underlyings: contract.underlyings().to_vec(),
            pricing_date: state.pricing_date(),
            maturity: contract.maturity(),
            n_paths: 0,
            n_times: 0,
            seed: None,
        },
    ))
}
