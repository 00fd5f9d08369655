//! Valuation results.

use pricer_core::types::Date;
use std::fmt;

/// How a present value was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValuationMethod {
    /// Lewis single-integral Fourier inversion.
    FourierLewis,
    /// Carr-Madan damped-call Fourier inversion.
    FourierCarrMadan,
    /// Monte Carlo average of terminal payoffs.
    MonteCarlo,
    /// Longstaff-Schwartz regression for early exercise.
    LeastSquaresMonteCarlo,
}

impl ValuationMethod {
    /// Whether the value carries sampling error.
    #[inline]
    pub fn is_simulation(&self) -> bool {
        matches!(self, Self::MonteCarlo | Self::LeastSquaresMonteCarlo)
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FourierLewis => "Fourier (Lewis)",
            Self::FourierCarrMadan => "Fourier (Carr-Madan)",
            Self::MonteCarlo => "Monte Carlo",
            Self::LeastSquaresMonteCarlo => "Monte Carlo (LSM)",
        };
        f.write_str(name)
    }
}

/// Inputs that produced a [`ValuationResult`], kept for reproducibility
/// checks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuationInputs {
    /// Valuation method.
    pub method: ValuationMethod,
    /// Risk factors of the contract, in payoff order.
    pub underlyings: Vec<String>,
    /// Pricing date.
    pub pricing_date: Date,
    /// Contract maturity.
    pub maturity: Date,
    /// Simulated paths (0 for Fourier).
    pub n_paths: usize,
    /// Time-grid points (0 for Fourier).
    pub n_times: usize,
    /// Base seed of the simulation.
    pub seed: Option<u64>,
}

/// Present value estimate.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::Date;
/// use pricer_pricing::valuation::{ValuationInputs, ValuationMethod, ValuationResult};
///
/// let date = Date::from_ymd(2015, 1, 1).unwrap();
/// let inputs = ValuationInputs {
///     method: ValuationMethod::MonteCarlo,
///     underlyings: vec!["gbm".into()],
///     pricing_date: date,
///     maturity: date.add_months(6).unwrap(),
///     n_paths: 4,
///     n_times: 2,
///     seed: Some(1),
/// };
/// let result = ValuationResult::from_path_values(&[1.0, 2.0, 3.0, 4.0], inputs);
/// assert_eq!(result.value, 2.5);
/// assert!((result.std_error - 0.6454972243679028).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuationResult {
    /// Present value.
    pub value: f64,
    /// Standard error of the estimate; zero for deterministic methods.
    pub std_error: f64,
    /// Inputs of the valuation.
    pub inputs: ValuationInputs,
}

impl ValuationResult {
    /// Result of a deterministic method.
    pub fn exact(value: f64, inputs: ValuationInputs) -> Self {
        Self {
            value,
            std_error: 0.0,
            inputs,
        }
    }

    /// Mean and standard error of per-path discounted values.
    pub fn from_path_values(values: &[f64], inputs: ValuationInputs) -> Self {
        let (value, std_error) = mean_and_std_error(values);
        Self {
            value,
            std_error,
            inputs,
        }
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        2.576 * self.std_error
    }
}

/// Sample mean and `sample std / sqrt(n)`.
pub fn mean_and_std_error(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    (mean, (var / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std_error() {
        assert_eq!(mean_and_std_error(&[]), (0.0, 0.0));
        assert_eq!(mean_and_std_error(&[3.0]), (3.0, 0.0));
        let (m, se) = mean_and_std_error(&[1.0, 3.0]);
        assert_relative_eq!(m, 2.0);
        assert_relative_eq!(se, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_method_flags() {
        assert!(ValuationMethod::LeastSquaresMonteCarlo.is_simulation());
        assert!(!ValuationMethod::FourierLewis.is_simulation());
        assert_eq!(ValuationMethod::FourierCarrMadan.to_string(), "Fourier (Carr-Madan)");
    }
}
