//! Black-Scholes pricing for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! With zero volatility or zero expiry the price collapses to the
//! discounted intrinsic value of the forward.

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Black-Scholes model with a flat short rate.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Create a model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or not finite
    /// - `AnalyticalError::InvalidVolatility` if volatility < 0 or not finite
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Short rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// d₁ term.
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let sigma_sqrt_t = self.volatility * expiry.sqrt();
        ((self.spot / strike).ln() + (self.rate + 0.5 * self.volatility * self.volatility) * expiry)
            / sigma_sqrt_t
    }

    /// d₂ = d₁ - σ√T.
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// European call price.
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        let df = (-self.rate * expiry).exp();
        if self.is_degenerate(strike, expiry) {
            return (self.spot - strike * df).max(0.0);
        }
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        self.spot * norm_cdf(d1) - strike * df * norm_cdf(d2)
    }

    /// European put price.
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        let df = (-self.rate * expiry).exp();
        if self.is_degenerate(strike, expiry) {
            return (strike * df - self.spot).max(0.0);
        }
        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        strike * df * norm_cdf(-d2) - self.spot * norm_cdf(-d1)
    }

    /// Price with validated contract terms.
    ///
    /// # Errors
    /// `AnalyticalError::InvalidTerms` if the strike is negative or the
    /// expiry is negative or either is not finite.
    pub fn price(&self, strike: f64, expiry: f64, is_call: bool) -> Result<f64, AnalyticalError> {
        if !strike.is_finite() || strike < 0.0 || !expiry.is_finite() || expiry < 0.0 {
            return Err(AnalyticalError::InvalidTerms { strike, expiry });
        }
        Ok(if is_call {
            self.price_call(strike, expiry)
        } else {
            self.price_put(strike, expiry)
        })
    }

    /// Call delta, N(d₁).
    pub fn delta_call(&self, strike: f64, expiry: f64) -> f64 {
        if self.is_degenerate(strike, expiry) {
            let forward_moneyness = self.spot - strike * (-self.rate * expiry).exp();
            return if forward_moneyness > 0.0 { 1.0 } else { 0.0 };
        }
        norm_cdf(self.d1(strike, expiry))
    }

    /// Vega, S·φ(d₁)·√T; identical for calls and puts.
    pub fn vega(&self, strike: f64, expiry: f64) -> f64 {
        if self.is_degenerate(strike, expiry) {
            return 0.0;
        }
        self.spot * norm_pdf(self.d1(strike, expiry)) * expiry.sqrt()
    }

    #[inline]
    fn is_degenerate(&self, strike: f64, expiry: f64) -> bool {
        strike <= 0.0 || expiry <= 0.0 || self.volatility * expiry.sqrt() < 1e-14
    }
}
