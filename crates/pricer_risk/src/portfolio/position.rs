//! Positions: a quantity of one contract on shared market states.

use std::sync::Arc;

use pricer_models::instruments::ContractSpec;
use pricer_models::models::MarketState;

use super::error::PortfolioError;

/// Holding of `quantity` units of a contract.
///
/// The position keeps shared references to the market state of every
/// underlying of its contract, in contract order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::types::Date;
/// use pricer_models::instruments::ContractSpec;
/// use pricer_models::models::MarketState;
/// use pricer_risk::portfolio::Position;
///
/// let gbm = Arc::new(
///     MarketState::builder("gbm")
///         .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
///         .initial_value(36.0)
///         .volatility(0.2)
///         .build()
///         .unwrap(),
/// );
/// let put = ContractSpec::american_put("gbm", 40.0, Date::from_ymd(2015, 12, 31).unwrap()).unwrap();
/// let position = Position::new(3.0, put, vec![gbm]).unwrap();
/// assert_eq!(position.underlyings(), ["gbm"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    quantity: f64,
    contract: ContractSpec,
    states: Vec<Arc<MarketState>>,
}

impl Position {
    /// Creates a position.
    ///
    /// `states` must cover every underlying of `contract`; states for
    /// other factors are ignored.
    ///
    /// # Errors
    ///
    /// - `PortfolioError::UnknownRiskFactor` if an underlying has no state
    /// - `PortfolioError::InvalidQuantity` for a non-finite quantity
    pub fn new(quantity: f64, contract: ContractSpec, states: Vec<Arc<MarketState>>) -> Result<Self, PortfolioError> {
        if !quantity.is_finite() {
            return Err(PortfolioError::InvalidQuantity {
                position: contract.underlyings().join(","),
                quantity,
            });
        }
        let states = contract
            .underlyings()
            .iter()
            .map(|name| {
                states
                    .iter()
                    .find(|s| s.name() == name.as_str())
                    .cloned()
                    .ok_or_else(|| PortfolioError::UnknownRiskFactor(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            quantity,
            contract,
            states,
        })
    }

    /// Number of contract units held.
    #[inline]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Contract held.
    #[inline]
    pub fn contract(&self) -> &ContractSpec {
        &self.contract
    }

    /// Risk factors the position depends on, in contract order.
    #[inline]
    pub fn underlyings(&self) -> &[String] {
        self.contract.underlyings()
    }

    /// Market states aligned with [`underlyings`](Self::underlyings).
    #[inline]
    pub fn states(&self) -> &[Arc<MarketState>] {
        &self.states
    }

    /// Market state of the named underlying.
    pub fn state(&self, name: &str) -> Option<&Arc<MarketState>> {
        self.states.iter().find(|s| s.name() == name)
    }

    /// Copy of the position with the named factor's state replaced.
    pub(crate) fn with_state(&self, state: &Arc<MarketState>) -> Self {
        let states = self
            .states
            .iter()
            .map(|s| {
                if s.name() == state.name() {
                    Arc::clone(state)
                } else {
                    Arc::clone(s)
                }
            })
            .collect();
        Self {
            quantity: self.quantity,
            contract: self.contract.clone(),
            states,
        }
    }
}
