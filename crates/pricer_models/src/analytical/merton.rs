//! Merton (1976) jump-diffusion prices as a Poisson mixture of
//! Black-Scholes prices.
//!
//! ```text
//! C = sum_n exp(-l T) (l T)^n / n! * BS(S, K, r_n, sigma_n, T)
//! l         = lambda (1 + k),   k = exp(mu + delta^2/2) - 1
//! sigma_n^2 = sigma^2 + n delta^2 / T
//! r_n       = r - lambda k + n ln(1 + k) / T
//! ```

use super::black_scholes::BlackScholes;
use super::error::AnalyticalError;

/// Hard cap on the number of mixture terms.
const MAX_TERMS: usize = 200;
/// Stop once the remaining Poisson mass falls below this.
const TAIL_MASS: f64 = 1e-14;

/// Jump parameters of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MertonJumps {
    /// Poisson intensity `lambda`
    pub intensity: f64,
    /// Mean of the log jump size `mu`
    pub mean: f64,
    /// Standard deviation of the log jump size `delta`
    pub volatility: f64,
}

/// Merton European call by series expansion.
///
/// # Errors
/// Propagates invalid inputs from [`BlackScholes::new`] and returns
/// `AnalyticalError::SeriesDivergence` if the Poisson weights have not
/// been exhausted after the term cap.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{merton_series_call, BlackScholes, MertonJumps};
///
/// let no_jumps = MertonJumps { intensity: 0.0, mean: -0.1, volatility: 0.1 };
/// let merton = merton_series_call(100.0, 100.0, 0.01, 0.2, 1.0, no_jumps).unwrap();
/// let bs = BlackScholes::new(100.0, 0.01, 0.2).unwrap().price_call(100.0, 1.0);
/// assert!((merton - bs).abs() < 1e-12);
/// ```
pub fn merton_series_call(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    jumps: MertonJumps,
) -> Result<f64, AnalyticalError> {
    merton_series(spot, strike, rate, volatility, expiry, jumps, true)
}

/// Merton European put by series expansion.
///
/// # Errors
/// As for [`merton_series_call`].
pub fn merton_series_put(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    jumps: MertonJumps,
) -> Result<f64, AnalyticalError> {
    merton_series(spot, strike, rate, volatility, expiry, jumps, false)
}

fn merton_series(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    jumps: MertonJumps,
    is_call: bool,
) -> Result<f64, AnalyticalError> {
    // Validate spot and volatility up front.
    BlackScholes::new(spot, rate, volatility)?;
    if !strike.is_finite() || strike < 0.0 || !expiry.is_finite() || expiry <= 0.0 {
        return Err(AnalyticalError::InvalidTerms { strike, expiry });
    }
    if jumps.intensity == 0.0 {
        return BlackScholes::new(spot, rate, volatility)?.price(strike, expiry, is_call);
    }

    let log_mean = jumps.mean + 0.5 * jumps.volatility * jumps.volatility;
    let k = log_mean.exp_m1();
    let mixed_intensity = jumps.intensity * (1.0 + k) * expiry;

    let mut weight = (-mixed_intensity).exp();
    let mut cumulative = 0.0;
    let mut price = 0.0;

    for n in 0..MAX_TERMS {
        if n > 0 {
            weight *= mixed_intensity / n as f64;
        }
        let nf = n as f64;
        let sigma_n =
            (volatility * volatility + nf * jumps.volatility * jumps.volatility / expiry).sqrt();
        let rate_n = rate - jumps.intensity * k + nf * log_mean / expiry;
        let term = BlackScholes::new(spot, rate_n, sigma_n)?.price(strike, expiry, is_call)?;
        price += weight * term;
        cumulative += weight;

        if 1.0 - cumulative < TAIL_MASS && nf > mixed_intensity {
            return Ok(price);
        }
    }

    Err(AnalyticalError::SeriesDivergence { terms: MAX_TERMS })
}
