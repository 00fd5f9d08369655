//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: The valuation-core taxonomy every layer converts into
//! - `DateError`: Errors from date construction and parsing
//! - `CurrencyError`: Errors from currency parsing

use thiserror::Error;

/// Categorised valuation errors.
///
/// Every failure in the valuation core is local and synchronous: the
/// computations are deterministic given their inputs, so callers only
/// retry by supplying corrected inputs.
///
/// # Variants
/// - `InvalidConfig`: Malformed simulation or contract parameters
/// - `IntegrationDivergence`: Fourier quadrature failed to converge
/// - `InvalidContract`: Unsupported exercise/payoff combination
/// - `UnknownRiskFactor`: A query named a factor no position references
/// - `SingularCorrelation`: Correlation matrix is not positive semi-definite
/// - `InvalidMarketState`: A market snapshot violates its invariants
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidConfig("path count must be positive".to_string());
/// assert_eq!(format!("{}", err), "Invalid config: path count must be positive");
///
/// let err = PricingError::IntegrationDivergence { bound: 1600.0, magnitude: 0.25 };
/// assert!(format!("{}", err).contains("1600"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Malformed simulation or contract parameters.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The Fourier integrand did not decay within the truncation bound.
    #[error("Integration diverged: integrand magnitude {magnitude:e} at truncation bound {bound}")]
    IntegrationDivergence {
        /// Last truncation bound attempted
        bound: f64,
        /// Integrand envelope observed at that bound
        magnitude: f64,
    },

    /// Unsupported exercise style or payoff for the component.
    #[error("Invalid contract: {0}")]
    InvalidContract(String),

    /// Risk factor not referenced by any position.
    #[error("Unknown risk factor: {0}")]
    UnknownRiskFactor(String),

    /// Correlation matrix could not be factorised.
    #[error("Singular correlation: {0}")]
    SingularCorrelation(String),

    /// Market state parameters violate their invariants.
    #[error("Invalid market state: {0}")]
    InvalidMarketState(String),
}

/// Date-related errors.
///
/// # Examples
/// ```
/// use pricer_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),
}

impl From<DateError> for PricingError {
    fn from(err: DateError) -> Self {
        PricingError::InvalidConfig(err.to_string())
    }
}

/// Currency-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

impl From<CurrencyError> for PricingError {
    fn from(err: CurrencyError) -> Self {
        PricingError::InvalidContract(err.to_string())
    }
}
