//! Portfolio error types.

use pricer_core::types::PricingError;
use pricer_models::models::CorrelationError;
use thiserror::Error;

/// Errors that can occur during portfolio construction and valuation.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// Two positions share a name.
    #[error("Duplicate position: {0}")]
    DuplicatePosition(String),

    /// A name refers to no risk factor of the portfolio.
    #[error("Unknown risk factor: {0}")]
    UnknownRiskFactor(String),

    /// Two positions carry different market states under one factor name.
    #[error("Conflicting market states for risk factor {0}")]
    ConflictingMarketState(String),

    /// Market states disagree on the pricing date.
    #[error("Risk factor {factor} is priced on {found}, portfolio on {expected}")]
    PricingDateMismatch {
        /// Offending factor
        factor: String,
        /// Portfolio pricing date
        expected: String,
        /// Factor pricing date
        found: String,
    },

    /// Position quantity is not finite.
    #[error("Invalid quantity {quantity} for position {position}")]
    InvalidQuantity {
        /// Position name
        position: String,
        /// Quantity supplied
        quantity: f64,
    },

    /// Correlation matrix could not be factorised.
    #[error("Singular correlation: {0}")]
    SingularCorrelation(#[from] CorrelationError),

    /// Empty portfolio (no positions).
    #[error("Portfolio is empty")]
    EmptyPortfolio,

    /// Valuation of a position failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<PortfolioError> for PricingError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::UnknownRiskFactor(name) => PricingError::UnknownRiskFactor(name),
            PortfolioError::SingularCorrelation(e) => e.into(),
            PortfolioError::Pricing(e) => e,
            other => PricingError::InvalidConfig(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortfolioError::DuplicatePosition("eur_call_pos".to_string());
        assert_eq!(format!("{}", err), "Duplicate position: eur_call_pos");
        assert_eq!(format!("{}", PortfolioError::EmptyPortfolio), "Portfolio is empty");
    }

    #[test]
    fn test_conversion_keeps_taxonomy() {
        let err: PricingError = PortfolioError::UnknownRiskFactor("jd".to_string()).into();
        assert_eq!(err, PricingError::UnknownRiskFactor("jd".to_string()));

        let inner = PricingError::InvalidContract("expired".to_string());
        let err: PricingError = PortfolioError::Pricing(inner.clone()).into();
        assert_eq!(err, inner);

        let err: PricingError = PortfolioError::EmptyPortfolio.into();
        assert!(matches!(err, PricingError::InvalidConfig(_)));
    }
}
