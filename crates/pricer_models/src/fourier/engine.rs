//! Adaptive-truncation Fourier pricer.

use num_complex::Complex64;
use pricer_core::math::quadrature::GaussLegendre;
use pricer_core::types::PricingError;
use std::f64::consts::PI;
use tracing::{debug, warn};

use super::config::{FourierConfig, FourierMethod};
use super::integrand;
use crate::analytical::{merton_series_call, merton_series_put, BlackScholes, MertonJumps};
use crate::instruments::{ContractSpec, ExerciseStyle, Payoff};
use crate::models::{
    CharacteristicFunction, JumpParams, MarketState, ModelCharacteristic, ModelDynamics,
};

/// European call/put pricer integrating a model's characteristic function.
///
/// Calls are integrated directly; puts follow from put-call parity,
/// `P = C - S0 + K e^{-rT}`. States without a diffusion component have
/// characteristic functions that never decay, so those are valued by the
/// Black-Scholes and Merton closed forms instead.
///
/// # Examples
/// ```
/// use pricer_core::types::Date;
/// use pricer_models::fourier::{FourierConfig, FourierPricer};
/// use pricer_models::instruments::ContractSpec;
/// use pricer_models::models::MarketState;
///
/// let pricing_date = Date::from_ymd(2015, 1, 1).unwrap();
/// let state = MarketState::builder("gbm")
///     .pricing_date(pricing_date)
///     .initial_value(100.0)
///     .volatility(0.2)
///     .short_rate(0.01)
///     .build()
///     .unwrap();
/// let call = ContractSpec::european_call("gbm", 100.0, pricing_date.add_days(89).unwrap()).unwrap();
///
/// let pricer = FourierPricer::new(FourierConfig::default()).unwrap();
/// let value = pricer.present_value(&state, &call).unwrap();
/// assert!((value - 4.06).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct FourierPricer {
    config: FourierConfig,
    rule: GaussLegendre,
}

impl FourierPricer {
    /// Validate the configuration and build the quadrature rule.
    ///
    /// # Errors
    /// `PricingError::InvalidConfig` for unusable settings.
    pub fn new(config: FourierConfig) -> Result<Self, PricingError> {
        config.validate()?;
        let rule = GaussLegendre::new(config.nodes)?;
        Ok(Self { config, rule })
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &FourierConfig {
        &self.config
    }

    /// Present value of a European call or put on the state's risk factor.
    ///
    /// # Errors
    /// - `PricingError::InvalidContract` for American exercise, non-vanilla
    ///   payoffs, or a maturity not after the pricing date
    /// - `PricingError::UnknownRiskFactor` if the contract's underlying is
    ///   not the state's risk factor
    /// - `PricingError::IntegrationDivergence` if the integrand does not
    ///   decay before the maximum truncation bound
    pub fn present_value(
        &self,
        state: &MarketState,
        contract: &ContractSpec,
    ) -> Result<f64, PricingError> {
        if contract.exercise() != ExerciseStyle::European {
            return Err(PricingError::InvalidContract(format!(
                "Fourier pricing supports European exercise only, got {}",
                contract.exercise()
            )));
        }
        let (strike, is_call) = match contract.payoff() {
            Payoff::Call { strike } => (*strike, true),
            Payoff::Put { strike } => (*strike, false),
            other => {
                return Err(PricingError::InvalidContract(format!(
                    "Fourier pricing supports Call and Put payoffs only, got {}",
                    other.name()
                )))
            }
        };
        if let Some(name) = contract.underlyings().iter().find(|n| n.as_str() != state.name()) {
            return Err(PricingError::UnknownRiskFactor(name.clone()));
        }
        contract.check_maturity(state.pricing_date())?;

        let t = state.year_fraction(contract.maturity());
        if let Some(value) = zero_diffusion_value(state, strike, t, is_call) {
            debug!(factor = state.name(), "no diffusion, using closed form");
            return value;
        }
        let cf = ModelCharacteristic::from_state(state);
        self.price_with_cf(&cf, strike, t, is_call)
    }

    /// Price from an explicit characteristic function.
    ///
    /// # Errors
    /// - `PricingError::InvalidContract` for a negative strike or expiry
    /// - `PricingError::IntegrationDivergence` if the integrand does not
    ///   decay before the maximum truncation bound
    pub fn price_with_cf<C>(
        &self,
        cf: &C,
        strike: f64,
        t: f64,
        is_call: bool,
    ) -> Result<f64, PricingError>
    where
        C: CharacteristicFunction + ?Sized,
    {
        if !strike.is_finite() || strike < 0.0 || !t.is_finite() || t <= 0.0 {
            return Err(PricingError::InvalidContract(format!(
                "strike {} and expiry {} must be non-negative and positive",
                strike, t
            )));
        }
        let s0 = cf.initial_value();
        let discounted_strike = strike * (-cf.short_rate() * t).exp();

        let call = if strike == 0.0 {
            s0
        } else {
            match self.config.method {
                FourierMethod::Lewis => {
                    let f = integrand::lewis(cf, (s0 / strike).ln(), t);
                    let integral = self.integrate(&f)?;
                    s0 - (s0 * strike).sqrt() * (-cf.short_rate() * t).exp() / PI * integral
                }
                FourierMethod::CarrMadan { alpha } => {
                    let k = (strike / s0).ln();
                    let f = integrand::carr_madan(cf, k, t, alpha);
                    let integral = self.integrate(&f)?;
                    s0 * (-alpha * k).exp() / PI * integral
                }
            }
        };

        let value = if is_call {
            call
        } else {
            call - s0 + discounted_strike
        };
        if !value.is_finite() {
            return Err(PricingError::IntegrationDivergence {
                bound: self.config.max_bound,
                magnitude: value.abs(),
            });
        }
        Ok(value)
    }

    /// `int_0^bound Re f(u) du`, doubling the bound until the integrand
    /// over the outermost panel is below tolerance.
    fn integrate<F>(&self, f: &F) -> Result<f64, PricingError>
    where
        F: Fn(f64) -> Complex64,
    {
        let mut lower = 0.0;
        let mut bound = self.config.initial_bound;
        let mut total = 0.0;

        loop {
            let (piece, envelope) = self.integrate_range(f, lower, bound);
            total += piece;

            if !total.is_finite() || !envelope.is_finite() {
                warn!(bound, "Fourier integrand not finite");
                return Err(PricingError::IntegrationDivergence {
                    bound,
                    magnitude: envelope,
                });
            }
            if envelope < self.config.tolerance {
                return Ok(total);
            }
            if bound >= self.config.max_bound {
                warn!(bound, magnitude = envelope, "Fourier integrand did not decay");
                return Err(PricingError::IntegrationDivergence {
                    bound,
                    magnitude: envelope,
                });
            }

            lower = bound;
            bound = (2.0 * bound).min(self.config.max_bound);
            debug!(bound, magnitude = envelope, "extending Fourier truncation bound");
        }
    }

    /// Composite rule over `[a, b]`; returns the integral of the real part
    /// and the largest modulus seen over the last panel.
    fn integrate_range<F>(&self, f: &F, a: f64, b: f64) -> (f64, f64)
    where
        F: Fn(f64) -> Complex64,
    {
        let panels = ((b - a) / self.config.panel_width).ceil().max(1.0) as usize;
        let width = (b - a) / panels as f64;
        let half = 0.5 * width;

        let mut sum = 0.0;
        let mut envelope = 0.0_f64;
        for k in 0..panels {
            let mid = a + (k as f64 + 0.5) * width;
            let last = k + 1 == panels;
            let mut panel = 0.0;
            for (&x, &w) in self.rule.nodes().iter().zip(self.rule.weights()) {
                let value = f(half * x + mid);
                panel += w * value.re;
                if last {
                    envelope = envelope.max(value.norm());
                }
            }
            sum += half * panel;
        }
        (sum, envelope)
    }
}

/// Closed-form value when the state carries no diffusion: GBM or Merton
/// with zero volatility, Heston or Bates with zero initial and long-run
/// variance. `None` otherwise.
fn zero_diffusion_value(
    state: &MarketState,
    strike: f64,
    t: f64,
    is_call: bool,
) -> Option<Result<f64, PricingError>> {
    let jumps = match *state.dynamics() {
        ModelDynamics::GeometricBrownianMotion if state.volatility() == 0.0 => None,
        ModelDynamics::JumpDiffusion(jumps) if state.volatility() == 0.0 => Some(jumps),
        ModelDynamics::StochasticVolatility(v)
            if state.initial_variance() == 0.0 && v.long_run_variance == 0.0 =>
        {
            None
        }
        ModelDynamics::StochasticVolatilityJumpDiffusion(v, jumps)
            if state.initial_variance() == 0.0 && v.long_run_variance == 0.0 =>
        {
            Some(jumps)
        }
        _ => return None,
    };
    let (s0, r) = (state.initial_value(), state.short_rate());
    let value = match jumps {
        None => BlackScholes::new(s0, r, 0.0).and_then(|bs| bs.price(strike, t, is_call)),
        Some(JumpParams {
            intensity,
            mean,
            volatility,
        }) => {
            let jumps = MertonJumps {
                intensity,
                mean,
                volatility,
            };
            if is_call {
                merton_series_call(s0, strike, r, 0.0, t, jumps)
            } else {
                merton_series_put(s0, strike, r, 0.0, t, jumps)
            }
        }
    };
    Some(value.map_err(PricingError::from))
}
