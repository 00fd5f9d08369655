//! Error types for simulation configuration.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),
    /// Time grid with too few points.
    #[error("Time grid has {0} points, at least 2 required")]
    InsufficientGrid(usize),
    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPathCount(0);
        assert!(err.to_string().contains("Invalid path count 0"));

        let err = ConfigError::InsufficientGrid(1);
        assert!(err.to_string().contains("1 points"));

        let err = ConfigError::InvalidParameter {
            name: "frequency",
            value: "step must be positive".to_string(),
        };
        assert!(err.to_string().contains("frequency"));
    }

    #[test]
    fn test_converts_to_invalid_config() {
        let err: PricingError = ConfigError::InvalidPathCount(0).into();
        assert!(matches!(err, PricingError::InvalidConfig(_)));
    }
}
