//! Model dynamics and their parameter sets.
//!
//! Every risk factor follows one of four risk-neutral dynamics:
//!
//! | Dynamics | Extra parameters |
//! |----------|------------------|
//! | Geometric Brownian motion | none |
//! | Merton jump-diffusion | [`JumpParams`] |
//! | Heston stochastic volatility | [`VarianceParams`] |
//! | Bates (Heston + Merton jumps) | [`VarianceParams`], [`JumpParams`] |
//!
//! For the stochastic-volatility variants the market state's `volatility`
//! is the initial volatility, so the initial variance is its square.

use std::fmt;
use std::str::FromStr;

use super::error::ModelError;

/// Lognormal jump parameters of a compound Poisson process.
///
/// Log jump sizes are `N(mean, volatility^2)`, arriving with Poisson
/// intensity `intensity` per year.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpParams {
    /// Jump arrival intensity (lambda)
    pub intensity: f64,
    /// Mean of the log jump size (mu)
    pub mean: f64,
    /// Standard deviation of the log jump size (delta)
    pub volatility: f64,
}

impl JumpParams {
    /// Create a jump specification.
    pub fn new(intensity: f64, mean: f64, volatility: f64) -> Self {
        Self {
            intensity,
            mean,
            volatility,
        }
    }

    /// Expected relative jump size, `E[e^Y] - 1 = exp(mu + delta^2 / 2) - 1`.
    ///
    /// The drift is reduced by `intensity * compensator()` to keep the
    /// discounted asset a martingale.
    #[inline]
    pub fn compensator(&self) -> f64 {
        (self.mean + 0.5 * self.volatility * self.volatility).exp() - 1.0
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_non_negative("jump_intensity", self.intensity)?;
        check_finite("jump_mean", self.mean)?;
        check_non_negative("jump_volatility", self.volatility)
    }
}

/// Square-root variance process parameters (Heston).
///
/// `dv = kappa (theta - v) dt + xi sqrt(v) dZ`, with `corr(dW, dZ) = rho`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarianceParams {
    /// Mean-reversion speed (kappa)
    pub mean_reversion: f64,
    /// Long-run variance (theta)
    pub long_run_variance: f64,
    /// Volatility of variance (xi)
    pub vol_of_vol: f64,
    /// Correlation between asset and variance shocks (rho)
    pub correlation: f64,
}

impl VarianceParams {
    /// Create a variance-process specification.
    pub fn new(mean_reversion: f64, long_run_variance: f64, vol_of_vol: f64, correlation: f64) -> Self {
        Self {
            mean_reversion,
            long_run_variance,
            vol_of_vol,
            correlation,
        }
    }

    /// Feller condition `2 kappa theta >= xi^2`.
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.mean_reversion * self.long_run_variance >= self.vol_of_vol * self.vol_of_vol
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_non_negative("mean_reversion", self.mean_reversion)?;
        check_non_negative("long_run_variance", self.long_run_variance)?;
        check_non_negative("vol_of_vol", self.vol_of_vol)?;
        if !(-1.0..=1.0).contains(&self.correlation) {
            return Err(ModelError::InvalidParameter {
                name: "correlation",
                value: self.correlation,
                reason: "must lie in [-1, 1]",
            });
        }
        Ok(())
    }
}

/// Risk-neutral dynamics of one risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelDynamics {
    /// Geometric Brownian motion.
    #[default]
    GeometricBrownianMotion,
    /// Merton (1976) jump-diffusion.
    JumpDiffusion(JumpParams),
    /// Heston (1993) stochastic volatility.
    StochasticVolatility(VarianceParams),
    /// Bates (1996) stochastic volatility with Merton jumps.
    StochasticVolatilityJumpDiffusion(VarianceParams, JumpParams),
}

impl ModelDynamics {
    /// Model family of these dynamics.
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelDynamics::GeometricBrownianMotion => ModelKind::GeometricBrownianMotion,
            ModelDynamics::JumpDiffusion(_) => ModelKind::JumpDiffusion,
            ModelDynamics::StochasticVolatility(_) => ModelKind::StochasticVolatility,
            ModelDynamics::StochasticVolatilityJumpDiffusion(..) => {
                ModelKind::StochasticVolatilityJumpDiffusion
            }
        }
    }

    /// Jump parameters, if the dynamics have jumps.
    pub fn jumps(&self) -> Option<&JumpParams> {
        match self {
            ModelDynamics::JumpDiffusion(j) | ModelDynamics::StochasticVolatilityJumpDiffusion(_, j) => {
                Some(j)
            }
            _ => None,
        }
    }

    /// Variance-process parameters, if the dynamics have stochastic variance.
    pub fn variance(&self) -> Option<&VarianceParams> {
        match self {
            ModelDynamics::StochasticVolatility(v)
            | ModelDynamics::StochasticVolatilityJumpDiffusion(v, _) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn jumps_mut(&mut self) -> Option<&mut JumpParams> {
        match self {
            ModelDynamics::JumpDiffusion(j) | ModelDynamics::StochasticVolatilityJumpDiffusion(_, j) => {
                Some(j)
            }
            _ => None,
        }
    }

    pub(crate) fn variance_mut(&mut self) -> Option<&mut VarianceParams> {
        match self {
            ModelDynamics::StochasticVolatility(v)
            | ModelDynamics::StochasticVolatilityJumpDiffusion(v, _) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if let Some(j) = self.jumps() {
            j.validate()?;
        }
        if let Some(v) = self.variance() {
            v.validate()?;
        }
        Ok(())
    }
}

/// Model family, used to select discretisation schemes and for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    /// Geometric Brownian motion
    GeometricBrownianMotion,
    /// Merton jump-diffusion
    JumpDiffusion,
    /// Heston stochastic volatility
    StochasticVolatility,
    /// Bates stochastic volatility jump-diffusion
    StochasticVolatilityJumpDiffusion,
}

impl ModelKind {
    /// All model families, in order of increasing complexity.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::GeometricBrownianMotion,
        ModelKind::JumpDiffusion,
        ModelKind::StochasticVolatility,
        ModelKind::StochasticVolatilityJumpDiffusion,
    ];

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::GeometricBrownianMotion => "GBM",
            ModelKind::JumpDiffusion => "Merton",
            ModelKind::StochasticVolatility => "Heston",
            ModelKind::StochasticVolatilityJumpDiffusion => "Bates",
        }
    }

    /// Whether paths carry a variance process.
    pub fn has_stochastic_variance(&self) -> bool {
        matches!(
            self,
            ModelKind::StochasticVolatility | ModelKind::StochasticVolatilityJumpDiffusion
        )
    }

    /// Whether paths carry jumps.
    pub fn has_jumps(&self) -> bool {
        matches!(
            self,
            ModelKind::JumpDiffusion | ModelKind::StochasticVolatilityJumpDiffusion
        )
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar parameter of a market state that risk sweeps can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MarketParameter {
    /// Initial asset level
    InitialValue,
    /// Volatility (initial volatility for stochastic-variance models)
    Volatility,
    /// Flat short rate of the discount curve
    ShortRate,
    /// Jump intensity
    JumpIntensity,
    /// Mean log jump size
    JumpMean,
    /// Log jump size volatility
    JumpVolatility,
    /// Variance mean-reversion speed
    MeanReversion,
    /// Long-run variance
    LongRunVariance,
    /// Volatility of variance
    VolOfVol,
    /// Asset/variance correlation
    Correlation,
}

impl MarketParameter {
    /// Snake-case parameter name.
    pub fn name(&self) -> &'static str {
        match self {
            MarketParameter::InitialValue => "initial_value",
            MarketParameter::Volatility => "volatility",
            MarketParameter::ShortRate => "short_rate",
            MarketParameter::JumpIntensity => "jump_intensity",
            MarketParameter::JumpMean => "jump_mean",
            MarketParameter::JumpVolatility => "jump_volatility",
            MarketParameter::MeanReversion => "mean_reversion",
            MarketParameter::LongRunVariance => "long_run_variance",
            MarketParameter::VolOfVol => "vol_of_vol",
            MarketParameter::Correlation => "correlation",
        }
    }
}

impl fmt::Display for MarketParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarketParameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "initial_value" | "spot" => Ok(MarketParameter::InitialValue),
            "volatility" | "vol" => Ok(MarketParameter::Volatility),
            "short_rate" | "rate" => Ok(MarketParameter::ShortRate),
            "jump_intensity" | "lambda" => Ok(MarketParameter::JumpIntensity),
            "jump_mean" | "mu" => Ok(MarketParameter::JumpMean),
            "jump_volatility" | "delta" => Ok(MarketParameter::JumpVolatility),
            "mean_reversion" | "kappa" => Ok(MarketParameter::MeanReversion),
            "long_run_variance" | "theta" => Ok(MarketParameter::LongRunVariance),
            "vol_of_vol" | "xi" => Ok(MarketParameter::VolOfVol),
            "correlation" | "rho" => Ok(MarketParameter::Correlation),
            _ => Err(format!("Unknown market parameter: {}", s)),
        }
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "must be finite and non-negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compensator() {
        let j = JumpParams::new(0.75, -0.6, 0.25);
        assert_relative_eq!(j.compensator(), (-0.6_f64 + 0.03125).exp() - 1.0);
        assert_eq!(JumpParams::new(1.0, 0.0, 0.0).compensator(), 0.0);
    }

    #[test]
    fn test_variance_validation() {
        assert!(VarianceParams::new(2.0, 0.04, 0.3, -0.7).validate().is_ok());
        assert!(VarianceParams::new(2.0, 0.04, 0.3, -1.2).validate().is_err());
        assert!(VarianceParams::new(-1.0, 0.04, 0.3, 0.0).validate().is_err());
        assert!(VarianceParams::new(2.0, 0.04, f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_feller() {
        assert!(VarianceParams::new(2.0, 0.04, 0.3, 0.0).satisfies_feller());
        assert!(!VarianceParams::new(0.5, 0.04, 0.5, 0.0).satisfies_feller());
    }

    #[test]
    fn test_kind_accessors() {
        let bates = ModelDynamics::StochasticVolatilityJumpDiffusion(
            VarianceParams::new(2.0, 0.04, 0.3, -0.7),
            JumpParams::new(0.1, -0.1, 0.2),
        );
        assert_eq!(bates.kind(), ModelKind::StochasticVolatilityJumpDiffusion);
        assert!(bates.jumps().is_some());
        assert!(bates.variance().is_some());
        assert!(ModelDynamics::default().jumps().is_none());
        assert!(bates.kind().has_jumps() && bates.kind().has_stochastic_variance());
    }

    #[test]
    fn test_parameter_parse() {
        assert_eq!(
            "initial-value".parse::<MarketParameter>().unwrap(),
            MarketParameter::InitialValue
        );
        assert_eq!("vol".parse::<MarketParameter>().unwrap(), MarketParameter::Volatility);
        assert!("gamma".parse::<MarketParameter>().is_err());
        for p in [MarketParameter::VolOfVol, MarketParameter::JumpMean] {
            assert_eq!(p.name().parse::<MarketParameter>().unwrap(), p);
        }
    }
}
