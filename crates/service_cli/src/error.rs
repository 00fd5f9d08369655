//! CLI error types.

use pricer_core::types::PricingError;
use pricer_risk::portfolio::PortfolioError;
use thiserror::Error;

/// Errors raised by the command implementations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line value or environment override is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration file is well-formed TOML but describes an invalid
    /// portfolio.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The configuration file is not valid TOML for the expected layout.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// JSON output failure.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Valuation failure.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Portfolio construction or revaluation failure.
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
}

/// Result alias for the command implementations.
pub type Result<T> = std::result::Result<T, CliError>;
