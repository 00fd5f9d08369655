//! Error types for closed-form pricing.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Closed-form pricing errors.
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Negative or non-finite volatility.
    #[error("Invalid volatility: sigma = {volatility}")]
    InvalidVolatility {
        /// The rejected volatility
        volatility: f64,
    },

    /// Non-positive spot price.
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The rejected spot
        spot: f64,
    },

    /// Non-positive strike or negative expiry.
    #[error("Invalid contract terms: K = {strike}, T = {expiry}")]
    InvalidTerms {
        /// Strike
        strike: f64,
        /// Time to expiry
        expiry: f64,
    },

    /// Series expansion failed to converge.
    #[error("Series did not converge after {terms} terms")]
    SeriesDivergence {
        /// Number of terms summed
        terms: usize,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { .. } | AnalyticalError::InvalidSpot { .. } => {
                PricingError::InvalidMarketState(err.to_string())
            }
            AnalyticalError::InvalidTerms { .. } => PricingError::InvalidContract(err.to_string()),
            AnalyticalError::SeriesDivergence { .. } => PricingError::InvalidConfig(err.to_string()),
        }
    }
}
