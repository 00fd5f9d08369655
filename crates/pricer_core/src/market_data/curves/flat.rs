//! Flat yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Constant short-rate discount curve, `D(t) = exp(-r t)`.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
///
/// let curve = FlatCurve::new(0.01_f64);
/// let df = curve.discount_factor(89.0 / 365.0).unwrap();
/// assert!((df - (-0.01_f64 * 89.0 / 365.0).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Construct a flat curve with the given continuously compounded rate.
    #[inline]
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Construct a flat curve, rejecting NaN or infinite rates.
    pub fn try_new(rate: T) -> Result<Self, MarketDataError> {
        if !rate.is_finite() {
            return Err(MarketDataError::InvalidRate {
                rate: rate.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self { rate })
    }

    /// The constant rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factor_at_zero() {
        let curve = FlatCurve::new(0.05_f64);
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_discount_factor_negative_time() {
        let curve = FlatCurve::new(0.05_f64);
        assert_eq!(
            curve.discount_factor(-0.5).unwrap_err(),
            MarketDataError::InvalidMaturity { t: -0.5 }
        );
    }

    #[test]
    fn test_negative_rate_discount_above_one() {
        let curve = FlatCurve::new(-0.01_f64);
        assert!(curve.discount_factor(1.0).unwrap() > 1.0);
    }

    #[test]
    fn test_try_new_rejects_nan() {
        assert!(FlatCurve::try_new(f64::NAN).is_err());
        assert!(FlatCurve::try_new(0.02_f64).is_ok());
    }

    #[test]
    fn test_zero_rate_is_constant() {
        let curve = FlatCurve::new(0.03_f64);
        assert_eq!(curve.zero_rate(7.0).unwrap(), 0.03);
        assert_eq!(curve.zero_rate(0.25).unwrap(), curve.rate());
        assert!(curve.zero_rate(0.0).is_err());
    }
}
