//! Immutable market snapshot for one risk factor.
//!
//! A [`MarketState`] bundles everything the pricing engines need to know
//! about one underlying: its name, the pricing date, the initial level and
//! volatility, the model dynamics, the discount curve and the day count
//! used to turn dates into year fractions.
//!
//! States are never mutated after construction. Variations (risk sweeps,
//! scenario studies) are produced with [`MarketState::with_parameter`],
//! which returns a new validated snapshot, or by starting a builder from
//! an existing state with [`MarketStateBuilder::from_state`].

use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
use pricer_core::types::{Currency, Date, DayCountConvention, PricingError};

use super::dynamics::{check_finite, check_non_negative, ModelDynamics, ModelKind, MarketParameter};
use super::error::ModelError;

/// Market snapshot of one risk factor.
///
/// # Invariants
///
/// - `initial_value > 0`
/// - `volatility >= 0`, jump and variance parameters as validated by
///   their parameter types
/// - the short rate is finite
///
/// # Examples
///
/// ```
/// use pricer_core::types::Date;
/// use pricer_models::models::{MarketParameter, MarketState};
///
/// let state = MarketState::builder("gbm")
///     .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
///     .initial_value(100.0)
///     .volatility(0.2)
///     .short_rate(0.01)
///     .build()
///     .unwrap();
///
/// let bumped = state.with_parameter(MarketParameter::Volatility, 0.25).unwrap();
/// assert_eq!(bumped.volatility(), 0.25);
/// assert_eq!(state.volatility(), 0.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketState {
    name: String,
    pricing_date: Date,
    initial_value: f64,
    volatility: f64,
    dynamics: ModelDynamics,
    discount_curve: FlatCurve<f64>,
    day_count: DayCountConvention,
    currency: Currency,
}

impl MarketState {
    /// Start building a state for the risk factor `name`.
    pub fn builder(name: impl Into<String>) -> MarketStateBuilder {
        MarketStateBuilder::new(name)
    }

    /// Risk factor name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Valuation date.
    #[inline]
    pub fn pricing_date(&self) -> Date {
        self.pricing_date
    }

    /// Initial asset level.
    #[inline]
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Volatility; the initial volatility for stochastic-variance dynamics.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Initial variance, `volatility^2`.
    #[inline]
    pub fn initial_variance(&self) -> f64 {
        self.volatility * self.volatility
    }

    /// Model dynamics.
    #[inline]
    pub fn dynamics(&self) -> &ModelDynamics {
        &self.dynamics
    }

    /// Model family.
    #[inline]
    pub fn model_kind(&self) -> ModelKind {
        self.dynamics.kind()
    }

    /// Discount curve.
    #[inline]
    pub fn discount_curve(&self) -> &FlatCurve<f64> {
        &self.discount_curve
    }

    /// Flat short rate of the discount curve.
    #[inline]
    pub fn short_rate(&self) -> f64 {
        self.discount_curve.rate()
    }

    /// Day count used for year fractions.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Currency of the risk factor.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Year fraction from the pricing date to `date`.
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction_dates(self.pricing_date, date)
    }

    /// Discount factor for a cash flow paid at year fraction `t`.
    pub fn discount_factor(&self, t: f64) -> Result<f64, PricingError> {
        Ok(self.discount_curve.discount_factor(t)?)
    }

    /// Read a scalar parameter.
    ///
    /// # Errors
    /// `PricingError::InvalidMarketState` if the parameter is not defined
    /// for this state's dynamics.
    pub fn parameter(&self, parameter: MarketParameter) -> Result<f64, PricingError> {
        let unsupported = || ModelError::UnsupportedParameter {
            parameter: parameter.name(),
            model: self.model_kind().name(),
        };
        let value = match parameter {
            MarketParameter::InitialValue => self.initial_value,
            MarketParameter::Volatility => self.volatility,
            MarketParameter::ShortRate => self.short_rate(),
            MarketParameter::JumpIntensity => self.dynamics.jumps().ok_or_else(unsupported)?.intensity,
            MarketParameter::JumpMean => self.dynamics.jumps().ok_or_else(unsupported)?.mean,
            MarketParameter::JumpVolatility => self.dynamics.jumps().ok_or_else(unsupported)?.volatility,
            MarketParameter::MeanReversion => {
                self.dynamics.variance().ok_or_else(unsupported)?.mean_reversion
            }
            MarketParameter::LongRunVariance => {
                self.dynamics.variance().ok_or_else(unsupported)?.long_run_variance
            }
            MarketParameter::VolOfVol => self.dynamics.variance().ok_or_else(unsupported)?.vol_of_vol,
            MarketParameter::Correlation => {
                self.dynamics.variance().ok_or_else(unsupported)?.correlation
            }
        };
        Ok(value)
    }

    /// Copy-on-write override of one parameter.
    ///
    /// The receiver is left untouched; the returned state is validated
    /// against the same invariants as a freshly built one.
    ///
    /// # Errors
    /// `PricingError::InvalidMarketState` if the parameter is undefined for
    /// the dynamics or the new value violates an invariant.
    pub fn with_parameter(&self, parameter: MarketParameter, value: f64) -> Result<Self, PricingError> {
        let mut next = self.clone();
        let model = self.model_kind().name();
        let unsupported = || ModelError::UnsupportedParameter {
            parameter: parameter.name(),
            model,
        };
        match parameter {
            MarketParameter::InitialValue => next.initial_value = value,
            MarketParameter::Volatility => next.volatility = value,
            MarketParameter::ShortRate => {
                next.discount_curve = FlatCurve::try_new(value)?;
            }
            MarketParameter::JumpIntensity => {
                next.dynamics.jumps_mut().ok_or_else(unsupported)?.intensity = value
            }
            MarketParameter::JumpMean => next.dynamics.jumps_mut().ok_or_else(unsupported)?.mean = value,
            MarketParameter::JumpVolatility => {
                next.dynamics.jumps_mut().ok_or_else(unsupported)?.volatility = value
            }
            MarketParameter::MeanReversion => {
                next.dynamics.variance_mut().ok_or_else(unsupported)?.mean_reversion = value
            }
            MarketParameter::LongRunVariance => {
                next.dynamics.variance_mut().ok_or_else(unsupported)?.long_run_variance = value
            }
            MarketParameter::VolOfVol => {
                next.dynamics.variance_mut().ok_or_else(unsupported)?.vol_of_vol = value
            }
            MarketParameter::Correlation => {
                next.dynamics.variance_mut().ok_or_else(unsupported)?.correlation = value
            }
        }
        next.validate()?;
        Ok(next)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        if !(self.initial_value.is_finite() && self.initial_value > 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "initial_value",
                value: self.initial_value,
                reason: "must be finite and positive",
            });
        }
        check_non_negative("volatility", self.volatility)?;
        check_finite("short_rate", self.discount_curve.rate())?;
        self.dynamics.validate()
    }
}

/// Builder for [`MarketState`].
///
/// Defaults: volatility 0, short rate 0, GBM dynamics, ACT/365F, EUR.
/// The pricing date and initial value are required.
#[derive(Debug, Clone)]
pub struct MarketStateBuilder {
    name: String,
    pricing_date: Option<Date>,
    initial_value: Option<f64>,
    volatility: f64,
    short_rate: f64,
    dynamics: ModelDynamics,
    day_count: DayCountConvention,
    currency: Currency,
}

impl MarketStateBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pricing_date: None,
            initial_value: None,
            volatility: 0.0,
            short_rate: 0.0,
            dynamics: ModelDynamics::default(),
            day_count: DayCountConvention::default(),
            currency: Currency::default(),
        }
    }

    /// Start from an existing snapshot and override selected fields.
    pub fn from_state(state: &MarketState) -> Self {
        Self {
            name: state.name.clone(),
            pricing_date: Some(state.pricing_date),
            initial_value: Some(state.initial_value),
            volatility: state.volatility,
            short_rate: state.short_rate(),
            dynamics: state.dynamics,
            day_count: state.day_count,
            currency: state.currency,
        }
    }

    /// Rename the risk factor.
    #[inline]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the valuation date.
    #[inline]
    pub fn pricing_date(mut self, date: Date) -> Self {
        self.pricing_date = Some(date);
        self
    }

    /// Set the initial asset level.
    #[inline]
    pub fn initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Set the (initial) volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Set the flat short rate of the discount curve.
    #[inline]
    pub fn short_rate(mut self, rate: f64) -> Self {
        self.short_rate = rate;
        self
    }

    /// Set the model dynamics.
    #[inline]
    pub fn dynamics(mut self, dynamics: ModelDynamics) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// Set the day count convention.
    #[inline]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Set the currency.
    #[inline]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<MarketState, PricingError> {
        let pricing_date = self
            .pricing_date
            .ok_or(ModelError::MissingField("pricing_date"))?;
        let initial_value = self
            .initial_value
            .ok_or(ModelError::MissingField("initial_value"))?;
        let state = MarketState {
            name: self.name,
            pricing_date,
            initial_value,
            volatility: self.volatility,
            dynamics: self.dynamics,
            discount_curve: FlatCurve::try_new(self.short_rate)?,
            day_count: self.day_count,
            currency: self.currency,
        };
        state.validate()?;
        Ok(state)
    }
}
