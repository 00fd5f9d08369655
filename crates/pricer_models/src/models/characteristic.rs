//! Characteristic functions of the log asset price.
//!
//! For each model the characteristic function of the log return
//! `X_T = ln(S_T / S_0)` under the risk-neutral measure is available in
//! closed form:
//!
//! ```text
//! GBM:     phi(u) = exp(i u (r - sigma^2/2) T - u^2 sigma^2 T / 2)
//! Merton:  phi(u) = exp(T [i u omega - u^2 sigma^2 / 2
//!                          + lambda (exp(i u mu - u^2 delta^2 / 2) - 1)])
//!          omega  = r - sigma^2/2 - lambda (exp(mu + delta^2/2) - 1)
//! Heston:  phi(u) = exp(i u r T + C(u) + D(u) v0)
//! Bates:   phi(u) = phi_Heston(u) * exp(lambda T (exp(i u mu - u^2 delta^2/2) - 1)
//!                                       - i u lambda T (exp(mu + delta^2/2) - 1))
//! ```
//!
//! The Heston terms use the Gatheral form with `g = (beta - d) / (beta + d)`
//! and `exp(-d T)`, which keeps the complex logarithm on its principal branch
//! for every `u` on the integration contour ("little trap"). When the
//! volatility of variance vanishes the variance path is deterministic and
//! the closed form for integrated variance is used instead.
//!
//! All functions accept a complex argument so the Fourier engine can shift
//! the contour into the strip of analyticity.

use num_complex::Complex64;

use super::dynamics::{JumpParams, ModelDynamics, ModelKind, VarianceParams};
use super::market_state::MarketState;

/// Below this vol-of-vol the variance process is treated as deterministic.
const DETERMINISTIC_VARIANCE_EPS: f64 = 1e-10;

/// Characteristic function of a model's log asset price.
pub trait CharacteristicFunction {
    /// `E[exp(i u ln(S_T / S_0))]` for maturity `t` (in years).
    fn log_return_cf(&self, u: Complex64, t: f64) -> Complex64;

    /// Initial asset level `S_0`.
    fn initial_value(&self) -> f64;

    /// Flat short rate used for discounting and drift.
    fn short_rate(&self) -> f64;

    /// `E[exp(i u ln S_T)]`.
    fn log_price_cf(&self, u: Complex64, t: f64) -> Complex64 {
        let i = Complex64::i();
        (i * u * self.initial_value().ln()).exp() * self.log_return_cf(u, t)
    }
}

/// Geometric Brownian motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbmCharacteristic {
    /// Initial level
    pub initial_value: f64,
    /// Short rate
    pub short_rate: f64,
    /// Volatility
    pub volatility: f64,
}

impl CharacteristicFunction for GbmCharacteristic {
    fn log_return_cf(&self, u: Complex64, t: f64) -> Complex64 {
        let i = Complex64::i();
        let var = self.volatility * self.volatility;
        (i * u * (self.short_rate - 0.5 * var) * t - 0.5 * var * t * u * u).exp()
    }

    fn initial_value(&self) -> f64 {
        self.initial_value
    }

    fn short_rate(&self) -> f64 {
        self.short_rate
    }
}

/// Merton (1976) jump-diffusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MertonCharacteristic {
    /// Initial level
    pub initial_value: f64,
    /// Short rate
    pub short_rate: f64,
    /// Diffusion volatility
    pub volatility: f64,
    /// Jump specification
    pub jumps: JumpParams,
}

impl CharacteristicFunction for MertonCharacteristic {
    fn log_return_cf(&self, u: Complex64, t: f64) -> Complex64 {
        let i = Complex64::i();
        let var = self.volatility * self.volatility;
        let omega = self.short_rate - 0.5 * var - self.jumps.intensity * self.jumps.compensator();
        let diffusion = i * u * omega - 0.5 * var * u * u;
        (t * (diffusion + jump_exponent(&self.jumps, u))).exp()
    }

    fn initial_value(&self) -> f64 {
        self.initial_value
    }

    fn short_rate(&self) -> f64 {
        self.short_rate
    }
}

/// Heston (1993) stochastic volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HestonCharacteristic {
    /// Initial level
    pub initial_value: f64,
    /// Short rate
    pub short_rate: f64,
    /// Initial variance `v0`
    pub initial_variance: f64,
    /// Variance process
    pub variance: VarianceParams,
}

impl CharacteristicFunction for HestonCharacteristic {
    fn log_return_cf(&self, u: Complex64, t: f64) -> Complex64 {
        let i = Complex64::i();
        let drift = i * u * self.short_rate * t;
        (drift + heston_exponent(&self.variance, self.initial_variance, u, t)).exp()
    }

    fn initial_value(&self) -> f64 {
        self.initial_value
    }

    fn short_rate(&self) -> f64 {
        self.short_rate
    }
}

/// Bates (1996) stochastic volatility with lognormal jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatesCharacteristic {
    /// Initial level
    pub initial_value: f64,
    /// Short rate
    pub short_rate: f64,
    /// Initial variance `v0`
    pub initial_variance: f64,
    /// Variance process
    pub variance: VarianceParams,
    /// Jump specification
    pub jumps: JumpParams,
}

impl CharacteristicFunction for BatesCharacteristic {
    fn log_return_cf(&self, u: Complex64, t: f64) -> Complex64 {
        let i = Complex64::i();
        let drift = i * u * (self.short_rate - self.jumps.intensity * self.jumps.compensator()) * t;
        let jumps = t * jump_exponent(&self.jumps, u);
        (drift + heston_exponent(&self.variance, self.initial_variance, u, t) + jumps).exp()
    }

    fn initial_value(&self) -> f64 {
        self.initial_value
    }

    fn short_rate(&self) -> f64 {
        self.short_rate
    }
}

/// Static dispatch over the four model characteristic functions.
///
/// # Examples
///
/// ```
/// use num_complex::Complex64;
/// use pricer_core::types::Date;
/// use pricer_models::models::{CharacteristicFunction, MarketState, ModelCharacteristic};
///
/// let state = MarketState::builder("gbm")
///     .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
///     .initial_value(100.0)
///     .volatility(0.2)
///     .short_rate(0.01)
///     .build()
///     .unwrap();
/// let cf = ModelCharacteristic::from_state(&state);
/// // phi(0) = 1 for every model
/// let one = cf.log_return_cf(Complex64::new(0.0, 0.0), 1.0);
/// assert!((one - Complex64::new(1.0, 0.0)).norm() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelCharacteristic {
    /// Geometric Brownian motion
    Gbm(GbmCharacteristic),
    /// Merton jump-diffusion
    Merton(MertonCharacteristic),
    /// Heston stochastic volatility
    Heston(HestonCharacteristic),
    /// Bates stochastic volatility jump-diffusion
    Bates(BatesCharacteristic),
}

impl ModelCharacteristic {
    /// Build the characteristic function matching a state's dynamics.
    pub fn from_state(state: &MarketState) -> Self {
        let initial_value = state.initial_value();
        let short_rate = state.short_rate();
        match *state.dynamics() {
            ModelDynamics::GeometricBrownianMotion => ModelCharacteristic::Gbm(GbmCharacteristic {
                initial_value,
                short_rate,
                volatility: state.volatility(),
            }),
            ModelDynamics::JumpDiffusion(jumps) => ModelCharacteristic::Merton(MertonCharacteristic {
                initial_value,
                short_rate,
                volatility: state.volatility(),
                jumps,
            }),
            ModelDynamics::StochasticVolatility(variance) => {
                ModelCharacteristic::Heston(HestonCharacteristic {
                    initial_value,
                    short_rate,
                    initial_variance: state.initial_variance(),
                    variance,
                })
            }
            ModelDynamics::StochasticVolatilityJumpDiffusion(variance, jumps) => {
                ModelCharacteristic::Bates(BatesCharacteristic {
                    initial_value,
                    short_rate,
                    initial_variance: state.initial_variance(),
                    variance,
                    jumps,
                })
            }
        }
    }

    /// Model family.
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelCharacteristic::Gbm(_) => ModelKind::GeometricBrownianMotion,
            ModelCharacteristic::Merton(_) => ModelKind::JumpDiffusion,
            ModelCharacteristic::Heston(_) => ModelKind::StochasticVolatility,
            ModelCharacteristic::Bates(_) => ModelKind::StochasticVolatilityJumpDiffusion,
        }
    }
}

impl CharacteristicFunction for ModelCharacteristic {
    fn log_return_cf(&self, u: Complex64, t: f64) -> Complex64 {
        match self {
            ModelCharacteristic::Gbm(cf) => cf.log_return_cf(u, t),
            ModelCharacteristic::Merton(cf) => cf.log_return_cf(u, t),
            ModelCharacteristic::Heston(cf) => cf.log_return_cf(u, t),
            ModelCharacteristic::Bates(cf) => cf.log_return_cf(u, t),
        }
    }

    fn initial_value(&self) -> f64 {
        match self {
            ModelCharacteristic::Gbm(cf) => cf.initial_value,
            ModelCharacteristic::Merton(cf) => cf.initial_value,
            ModelCharacteristic::Heston(cf) => cf.initial_value,
            ModelCharacteristic::Bates(cf) => cf.initial_value,
        }
    }

    fn short_rate(&self) -> f64 {
        match self {
            ModelCharacteristic::Gbm(cf) => cf.short_rate,
            ModelCharacteristic::Merton(cf) => cf.short_rate,
            ModelCharacteristic::Heston(cf) => cf.short_rate,
            ModelCharacteristic::Bates(cf) => cf.short_rate,
        }
    }
}

/// Characteristic function of `ln S_T` for a market state.
pub fn characteristic_function(state: &MarketState, u: Complex64, t: f64) -> Complex64 {
    ModelCharacteristic::from_state(state).log_price_cf(u, t)
}

/// Per-unit-time jump exponent without compensator,
/// `lambda (exp(i u mu - u^2 delta^2 / 2) - 1)`.
fn jump_exponent(jumps: &JumpParams, u: Complex64) -> Complex64 {
    let i = Complex64::i();
    let d2 = jumps.volatility * jumps.volatility;
    jumps.intensity * ((i * u * jumps.mean - 0.5 * d2 * u * u).exp() - 1.0)
}

/// `C(u) + D(u) v0` of the Heston log-return characteristic function
/// (without the `i u r T` drift).
fn heston_exponent(p: &VarianceParams, v0: f64, u: Complex64, t: f64) -> Complex64 {
    let i = Complex64::i();
    let kappa = p.mean_reversion;
    let theta = p.long_run_variance;
    let xi = p.vol_of_vol;

    if xi < DETERMINISTIC_VARIANCE_EPS {
        let integrated = integrated_deterministic_variance(kappa, theta, v0, t);
        return -0.5 * integrated * (u * u + i * u);
    }

    let xi2 = xi * xi;
    let alpha = -0.5 * u * (u + i);
    let beta = kappa - p.correlation * xi * i * u;
    let d = (beta * beta - 2.0 * xi2 * alpha).sqrt();
    let g = (beta - d) / (beta + d);
    let exp_dt = (-d * t).exp();

    let c = (kappa * theta / xi2) * ((beta - d) * t - 2.0 * ((1.0 - g * exp_dt) / (1.0 - g)).ln());
    let dv = ((beta - d) / xi2) * ((1.0 - exp_dt) / (1.0 - g * exp_dt));
    c + dv * v0
}

/// `int_0^T v(s) ds` for `dv = kappa (theta - v) dt`.
fn integrated_deterministic_variance(kappa: f64, theta: f64, v0: f64, t: f64) -> f64 {
    if kappa * t < 1e-12 {
        return v0 * t;
    }
    theta * t + (v0 - theta) * (1.0 - (-kappa * t).exp()) / kappa
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const S0: f64 = 100.0;
    const R: f64 = 0.05;

    fn heston(xi: f64) -> HestonCharacteristic {
        HestonCharacteristic {
            initial_value: S0,
            short_rate: R,
            initial_variance: 0.04,
            variance: VarianceParams::new(1.5, 0.04, xi, -0.7),
        }
    }

    fn assert_complex_eq(a: Complex64, b: Complex64, tol: f64) {
        assert!((a - b).norm() < tol, "{} != {}", a, b);
    }

    #[test]
    fn test_gbm_martingale() {
        // E[S_T] = S_0 e^{rT}  <=>  phi(-i) = e^{rT}
        let cf = GbmCharacteristic {
            initial_value: S0,
            short_rate: R,
            volatility: 0.3,
        };
        let m = cf.log_return_cf(Complex64::new(0.0, -1.0), 2.0);
        assert_complex_eq(m, Complex64::new((R * 2.0).exp(), 0.0), 1e-13);
    }

    #[test]
    fn test_all_models_martingale() {
        let jumps = JumpParams::new(0.75, -0.6, 0.25);
        let models = [
            ModelCharacteristic::Merton(MertonCharacteristic {
                initial_value: S0,
                short_rate: R,
                volatility: 0.2,
                jumps,
            }),
            ModelCharacteristic::Heston(heston(0.3)),
            ModelCharacteristic::Bates(BatesCharacteristic {
                initial_value: S0,
                short_rate: R,
                initial_variance: 0.04,
                variance: VarianceParams::new(1.5, 0.04, 0.3, -0.7),
                jumps,
            }),
        ];
        for cf in models {
            let m = cf.log_return_cf(Complex64::new(0.0, -1.0), 1.0);
            assert_complex_eq(m, Complex64::new(R.exp(), 0.0), 1e-10);
        }
    }

    #[test]
    fn test_merton_zero_intensity_is_gbm() {
        let gbm = GbmCharacteristic {
            initial_value: S0,
            short_rate: R,
            volatility: 0.2,
        };
        let merton = MertonCharacteristic {
            initial_value: S0,
            short_rate: R,
            volatility: 0.2,
            jumps: JumpParams::new(0.0, -0.6, 0.25),
        };
        for u in [0.5, 3.0, 17.0] {
            let z = Complex64::new(u, -0.5);
            assert_complex_eq(gbm.log_return_cf(z, 1.0), merton.log_return_cf(z, 1.0), 1e-15);
        }
    }

    #[test]
    fn test_bates_zero_intensity_is_heston() {
        let h = heston(0.3);
        let b = BatesCharacteristic {
            initial_value: S0,
            short_rate: R,
            initial_variance: 0.04,
            variance: h.variance,
            jumps: JumpParams::new(0.0, -0.1, 0.2),
        };
        for u in [0.1, 5.0, 80.0] {
            let z = Complex64::new(u, -0.5);
            assert_complex_eq(h.log_return_cf(z, 1.0), b.log_return_cf(z, 1.0), 1e-15);
        }
    }

    #[test]
    fn test_heston_degenerate_matches_gbm_when_flat() {
        // v0 = theta and xi = 0 => constant variance => GBM
        let h = heston(0.0);
        let gbm = GbmCharacteristic {
            initial_value: S0,
            short_rate: R,
            volatility: 0.2,
        };
        for u in [0.3, 2.0, 40.0] {
            let z = Complex64::new(u, -0.5);
            assert_complex_eq(h.log_return_cf(z, 1.5), gbm.log_return_cf(z, 1.5), 1e-14);
        }
    }

    #[test]
    fn test_heston_small_vol_of_vol_is_continuous() {
        let z = Complex64::new(4.0, -0.5);
        let exact = heston(0.0).log_return_cf(z, 1.0);
        let near = heston(1e-3).log_return_cf(z, 1.0);
        assert_complex_eq(exact, near, 1e-4);
    }

    #[test]
    fn test_heston_long_maturity_no_branch_jump() {
        // The little-trap form is continuous along the real axis even for
        // long maturities, where the naive form wraps the logarithm.
        let h = HestonCharacteristic {
            initial_value: S0,
            short_rate: 0.0,
            initial_variance: 0.09,
            variance: VarianceParams::new(0.5, 0.09, 1.0, -0.9),
        };
        let mut prev = h.log_return_cf(Complex64::new(0.0, 0.0), 10.0);
        let mut u = 0.01;
        while u < 30.0 {
            let next = h.log_return_cf(Complex64::new(u, 0.0), 10.0);
            assert!((next - prev).norm() < 0.05, "jump at u = {}", u);
            prev = next;
            u += 0.01;
        }
    }

    #[test]
    fn test_from_state_dispatch() {
        use pricer_core::types::Date;
        let state = MarketState::builder("bates")
            .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
            .initial_value(S0)
            .volatility(0.2)
            .short_rate(R)
            .dynamics(ModelDynamics::StochasticVolatilityJumpDiffusion(
                VarianceParams::new(1.5, 0.04, 0.3, -0.7),
                JumpParams::new(0.1, -0.1, 0.2),
            ))
            .build()
            .unwrap();
        let cf = ModelCharacteristic::from_state(&state);
        assert_eq!(cf.kind(), ModelKind::StochasticVolatilityJumpDiffusion);
        assert_eq!(cf.initial_value(), S0);
        let lp = characteristic_function(&state, Complex64::new(1.0, 0.0), 1.0);
        let lr = cf.log_return_cf(Complex64::new(1.0, 0.0), 1.0);
        assert_complex_eq(lp, lr * Complex64::new(0.0, S0.ln()).exp(), 1e-14);
    }

    #[test]
    fn test_integrated_variance_limits() {
        assert_relative_eq!(integrated_deterministic_variance(0.0, 0.04, 0.09, 2.0), 0.18);
        assert_relative_eq!(
            integrated_deterministic_variance(50.0, 0.04, 0.09, 100.0),
            4.0 + 0.05 / 50.0,
            epsilon = 1e-12
        );
    }

    proptest! {
        #[test]
        fn prop_cf_bounded_on_real_axis(u in 0.0..200.0f64, t in 0.05..5.0f64) {
            let cf = heston(0.5);
            let v = cf.log_return_cf(Complex64::new(u, 0.0), t);
            prop_assert!(v.norm() <= 1.0 + 1e-10);
        }
    }
}
