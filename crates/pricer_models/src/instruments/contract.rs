//! Contract specifications.

use pricer_core::types::{Currency, Date, PricingError};

use super::error::InstrumentError;
use super::exercise::ExerciseStyle;
use super::payoff::Payoff;

/// Terms of an option contract.
///
/// A contract names the risk factors it depends on; built-in payoffs read
/// their levels in that order. The maturity must lie after the pricing
/// date of the market states it is valued against, which is checked by
/// [`check_maturity`](Self::check_maturity) at valuation time.
///
/// # Examples
///
/// ```
/// use pricer_core::types::Date;
/// use pricer_models::instruments::{ContractSpec, ExerciseStyle, Payoff};
///
/// let maturity = Date::from_ymd(2015, 12, 31).unwrap();
/// let put = ContractSpec::american_put("gbm", 40.0, maturity).unwrap();
/// assert_eq!(put.exercise(), ExerciseStyle::American);
/// assert_eq!(put.strike(), Some(40.0));
///
/// let best_of = ContractSpec::new(
///     ExerciseStyle::European,
///     vec!["gbm".into(), "jd".into()],
///     maturity,
///     Payoff::MaxCall { strike: 36.0 },
/// )
/// .unwrap();
/// assert_eq!(best_of.underlyings().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContractSpec {
    exercise: ExerciseStyle,
    underlyings: Vec<String>,
    maturity: Date,
    payoff: Payoff,
    currency: Currency,
}

impl ContractSpec {
    /// Create and validate a contract.
    ///
    /// # Errors
    /// `PricingError::InvalidContract` if the underlyings are empty or
    /// repeated, the strike is negative, a vanilla payoff has more than one
    /// underlying, or basket weights do not match the underlyings.
    pub fn new(
        exercise: ExerciseStyle,
        underlyings: Vec<String>,
        maturity: Date,
        payoff: Payoff,
    ) -> Result<Self, PricingError> {
        let spec = Self {
            exercise,
            underlyings,
            maturity,
            payoff,
            currency: Currency::default(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// European call on a single underlying.
    pub fn european_call(underlying: &str, strike: f64, maturity: Date) -> Result<Self, PricingError> {
        Self::single(ExerciseStyle::European, underlying, maturity, Payoff::Call { strike })
    }

    /// European put on a single underlying.
    pub fn european_put(underlying: &str, strike: f64, maturity: Date) -> Result<Self, PricingError> {
        Self::single(ExerciseStyle::European, underlying, maturity, Payoff::Put { strike })
    }

    /// American call on a single underlying.
    pub fn american_call(underlying: &str, strike: f64, maturity: Date) -> Result<Self, PricingError> {
        Self::single(ExerciseStyle::American, underlying, maturity, Payoff::Call { strike })
    }

    /// American put on a single underlying.
    pub fn american_put(underlying: &str, strike: f64, maturity: Date) -> Result<Self, PricingError> {
        Self::single(ExerciseStyle::American, underlying, maturity, Payoff::Put { strike })
    }

    fn single(
        exercise: ExerciseStyle,
        underlying: &str,
        maturity: Date,
        payoff: Payoff,
    ) -> Result<Self, PricingError> {
        Self::new(exercise, vec![underlying.to_string()], maturity, payoff)
    }

    /// Tag the contract with a currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Exercise style.
    #[inline]
    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    /// Risk factors the payoff reads, in payoff order.
    #[inline]
    pub fn underlyings(&self) -> &[String] {
        &self.underlyings
    }

    /// Whether the contract depends on one underlying only.
    #[inline]
    pub fn is_single_underlying(&self) -> bool {
        self.underlyings.len() == 1
    }

    /// Maturity date.
    #[inline]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Payoff functional.
    #[inline]
    pub fn payoff(&self) -> &Payoff {
        &self.payoff
    }

    /// Strike of a built-in payoff.
    #[inline]
    pub fn strike(&self) -> Option<f64> {
        self.payoff.strike()
    }

    /// Currency tag.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Require the maturity to fall strictly after `pricing_date`.
    pub fn check_maturity(&self, pricing_date: Date) -> Result<(), PricingError> {
        if self.maturity <= pricing_date {
            return Err(PricingError::InvalidContract(format!(
                "maturity {} is not after pricing date {}",
                self.maturity, pricing_date
            )));
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), InstrumentError> {
        if self.underlyings.is_empty() {
            return Err(InstrumentError::InvalidUnderlyings {
                message: "contract references no underlying".to_string(),
            });
        }
        for (i, name) in self.underlyings.iter().enumerate() {
            if self.underlyings[..i].contains(name) {
                return Err(InstrumentError::InvalidUnderlyings {
                    message: format!("underlying {} listed twice", name),
                });
            }
        }
        if let Some(strike) = self.payoff.strike() {
            if !strike.is_finite() || strike < 0.0 {
                return Err(InstrumentError::InvalidStrike { strike });
            }
        }
        match &self.payoff {
            Payoff::Call { .. } | Payoff::Put { .. } if self.underlyings.len() != 1 => {
                Err(InstrumentError::InvalidUnderlyings {
                    message: format!(
                        "{} payoff needs exactly one underlying, got {}",
                        self.payoff.name(),
                        self.underlyings.len()
                    ),
                })
            }
            Payoff::BasketCall { weights, .. } | Payoff::BasketPut { weights, .. } => {
                if weights.len() != self.underlyings.len() {
                    return Err(InstrumentError::InvalidUnderlyings {
                        message: format!(
                            "{} weights for {} underlyings",
                            weights.len(),
                            self.underlyings.len()
                        ),
                    });
                }
                if weights.iter().any(|w| !w.is_finite()) {
                    return Err(InstrumentError::InvalidUnderlyings {
                        message: "basket weights must be finite".to_string(),
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maturity() -> Date {
        Date::from_ymd(2015, 3, 31).unwrap()
    }

    #[test]
    fn test_single_constructors() {
        let call = ContractSpec::european_call("gbm", 100.0, maturity()).unwrap();
        assert!(call.is_single_underlying());
        assert_eq!(call.payoff(), &Payoff::Call { strike: 100.0 });
        assert_eq!(call.currency(), Currency::EUR);
        let usd = call.with_currency(Currency::USD);
        assert_eq!(usd.currency(), Currency::USD);
    }

    #[test]
    fn test_rejects_negative_strike() {
        let err = ContractSpec::european_put("gbm", -1.0, maturity()).unwrap_err();
        assert!(matches!(err, PricingError::InvalidContract(_)));
    }

    #[test]
    fn test_rejects_vanilla_with_two_underlyings() {
        let err = ContractSpec::new(
            ExerciseStyle::European,
            vec!["a".into(), "b".into()],
            maturity(),
            Payoff::Call { strike: 1.0 },
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::InvalidContract(_)));
    }

    #[test]
    fn test_rejects_duplicate_underlyings() {
        assert!(ContractSpec::new(
            ExerciseStyle::European,
            vec!["a".into(), "a".into()],
            maturity(),
            Payoff::MaxCall { strike: 1.0 },
        )
        .is_err());
    }

    #[test]
    fn test_rejects_mismatched_basket() {
        assert!(ContractSpec::new(
            ExerciseStyle::European,
            vec!["a".into(), "b".into()],
            maturity(),
            Payoff::BasketCall {
                weights: vec![1.0],
                strike: 1.0
            },
        )
        .is_err());
    }

    #[test]
    fn test_check_maturity() {
        let call = ContractSpec::european_call("gbm", 100.0, maturity()).unwrap();
        assert!(call.check_maturity(Date::from_ymd(2015, 1, 1).unwrap()).is_ok());
        assert!(call.check_maturity(maturity()).is_err());
    }
}
