//! Contract-ordered view over simulated path sets.

use pricer_core::types::PricingError;
use pricer_models::instruments::{ContractSpec, PayoffState};

use crate::mc::{PathSet, TimeGrid};

/// Path sets of a contract's underlyings, in payoff order, on one grid.
pub(crate) struct ContractPaths<'a> {
    contract: &'a ContractSpec,
    sets: Vec<&'a PathSet>,
    grid: &'a TimeGrid,
    maturity_index: usize,
}

impl<'a> ContractPaths<'a> {
    /// Pick the contract's underlyings out of `paths`.
    ///
    /// # Errors
    ///
    /// - `UnknownRiskFactor` if an underlying was not simulated
    /// - `InvalidConfig` if the path sets disagree in shape with each other
    ///   or the grid, or the maturity is not a grid date
    pub(crate) fn new(
        contract: &'a ContractSpec,
        paths: &'a [PathSet],
        grid: &'a TimeGrid,
    ) -> Result<Self, PricingError> {
        let sets = contract
            .underlyings()
            .iter()
            .map(|name| {
                paths
                    .iter()
                    .find(|set| set.factor() == name)
                    .ok_or_else(|| PricingError::UnknownRiskFactor(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n_paths = sets[0].n_paths();
        if sets
            .iter()
            .any(|set| set.n_paths() != n_paths || set.n_times() != grid.len())
        {
            return Err(PricingError::InvalidConfig(
                "path sets do not share the valuation grid".to_string(),
            ));
        }
        let maturity_index = grid.index_of(contract.maturity()).ok_or_else(|| {
            PricingError::InvalidConfig(format!(
                "maturity {} is not a simulation date",
                contract.maturity()
            ))
        })?;
        if maturity_index == 0 {
            return Err(PricingError::InvalidContract(format!(
                "maturity {} is not after the pricing date",
                contract.maturity()
            )));
        }

        Ok(Self {
            contract,
            sets,
            grid,
            maturity_index,
        })
    }

    #[inline]
    pub(crate) fn n_paths(&self) -> usize {
        self.sets[0].n_paths()
    }

    #[inline]
    pub(crate) fn maturity_index(&self) -> usize {
        self.maturity_index
    }

    #[inline]
    pub(crate) fn time(&self, k: usize) -> f64 {
        self.grid.times()[k]
    }

    #[inline]
    pub(crate) fn level(&self, i: usize, p: usize, k: usize) -> f64 {
        self.sets[i].level(p, k)
    }

    #[inline]
    pub(crate) fn n_underlyings(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub(crate) fn initial_level(&self, i: usize) -> f64 {
        self.sets[i].level(0, 0)
    }

    /// Payoff of path `p` if exercised at grid point `k`.
    pub(crate) fn payoff(&self, p: usize, k: usize) -> Result<f64, PricingError> {
        let histories: Vec<&[f64]> = self.sets.iter().map(|set| set.path(p)).collect();
        let levels: Vec<f64> = histories.iter().map(|h| h[k]).collect();
        let state = PayoffState::new(self.contract.underlyings(), &levels, &histories, k, self.time(k));
        Ok(self.contract.payoff().evaluate(&state)?)
    }
}
