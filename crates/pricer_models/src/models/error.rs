//! Error types for market state construction.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Market state validation errors.
///
/// # Examples
/// ```
/// use pricer_models::models::ModelError;
///
/// let err = ModelError::InvalidParameter {
///     name: "volatility",
///     value: -0.2,
///     reason: "must be non-negative",
/// };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A parameter is outside its admissible range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
        /// Admissible range
        reason: &'static str,
    },

    /// A required builder field was not supplied.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The parameter does not exist for the selected dynamics.
    #[error("Parameter {parameter} is not defined for {model} dynamics")]
    UnsupportedParameter {
        /// Parameter name
        parameter: &'static str,
        /// Model name
        model: &'static str,
    },
}

impl From<ModelError> for PricingError {
    fn from(err: ModelError) -> Self {
        PricingError::InvalidMarketState(err.to_string())
    }
}
