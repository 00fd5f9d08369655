//! Instrument error types.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Contract construction and payoff evaluation errors.
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Strike is negative or not finite.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The rejected strike
        strike: f64,
    },

    /// The payoff references no underlying, or a basket is malformed.
    #[error("Invalid underlyings: {message}")]
    InvalidUnderlyings {
        /// Description of the problem
        message: String,
    },

    /// Payoff evaluated to a negative or non-finite amount.
    #[error("Payoff {payoff} evaluated to {value} at step {step}")]
    InvalidPayoffValue {
        /// Payoff name
        payoff: &'static str,
        /// Rejected value
        value: f64,
        /// Time index of the evaluation
        step: usize,
    },

    /// The payoff needs an underlying the state does not carry.
    #[error("Payoff requires underlying {0}")]
    MissingUnderlying(String),
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidContract(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_payoff_value_display() {
        let err = InstrumentError::InvalidPayoffValue {
            payoff: "Custom",
            value: -1.5,
            step: 3,
        };
        assert_eq!(format!("{}", err), "Payoff Custom evaluated to -1.5 at step 3");
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = InstrumentError::MissingUnderlying("gbm".to_string()).into();
        assert!(matches!(err, PricingError::InvalidContract(msg) if msg.contains("gbm")));
    }
}
