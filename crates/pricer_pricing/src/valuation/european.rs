//! European exercise: discounted payoff at maturity.

use pricer_core::types::PricingError;
use pricer_models::models::MarketState;
use rayon::prelude::*;

use super::view::ContractPaths;

/// Discounted maturity payoff of every path.
pub(crate) fn path_values(paths: &ContractPaths<'_>, discounting: &MarketState) -> Result<Vec<f64>, PricingError> {
    let m = paths.maturity_index();
    let df = discounting.discount_factor(paths.time(m))?;
    (0..paths.n_paths())
        .into_par_iter()
        .map(|p| Ok(df * paths.payoff(p, m)?))
        .collect()
}
