//! Monte Carlo simulation configuration.
//!
//! [`SimulationConfig`] fixes everything about a simulation except the
//! market states and the time grid: path count, grid frequency, seed mode,
//! variance reduction and the discretisation scheme per model family.

use pricer_models::models::ModelKind;

use super::error::ConfigError;
use crate::rng::SeedMode;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Path count of [`SimulationConfig::default`].
pub const DEFAULT_PATHS: usize = 10_000;

/// Spacing of the simulation grid between pricing date and maturity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Frequency {
    /// Every calendar day.
    Daily,
    /// Every seven days.
    #[default]
    Weekly,
    /// Same day-of-month each month (clamped to month end).
    Monthly,
    /// Every `n` calendar days.
    EveryNDays(u32),
}

impl Frequency {
    /// Check the step is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Frequency::EveryNDays(0) => Err(ConfigError::InvalidParameter {
                name: "frequency",
                value: "EveryNDays step must be positive".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Discretisation of the asset process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiscretisationScheme {
    /// Exact log-normal transition (log-Euler under stochastic variance).
    #[default]
    Exact,
    /// Plain Euler step on the asset level.
    Euler,
}

/// Non-negativity treatment of the Euler variance step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VarianceFloor {
    /// Use `max(v, 0)` in drift and diffusion and floor the result at zero.
    #[default]
    FullTruncation,
    /// Reflect negative variances, `v -> |v|`.
    Reflection,
}

impl VarianceFloor {
    /// Apply the floor to a raw Euler update.
    #[inline]
    pub fn apply(&self, variance: f64) -> f64 {
        match self {
            VarianceFloor::FullTruncation => variance.max(0.0),
            VarianceFloor::Reflection => variance.abs(),
        }
    }
}

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{DiscretisationScheme, Frequency, SimulationConfig};
/// use pricer_pricing::rng::SeedMode;
/// use pricer_models::models::ModelKind;
///
/// let config = SimulationConfig::builder()
///     .n_paths(55_000)
///     .frequency(Frequency::Daily)
///     .seed_mode(SeedMode::Fixed(42))
///     .antithetic(true)
///     .scheme(ModelKind::GeometricBrownianMotion, DiscretisationScheme::Euler)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 55_000);
/// assert_eq!(config.scheme(ModelKind::GeometricBrownianMotion), DiscretisationScheme::Euler);
/// assert_eq!(config.scheme(ModelKind::JumpDiffusion), DiscretisationScheme::Exact);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    n_paths: usize,
    frequency: Frequency,
    seed_mode: SeedMode,
    antithetic: bool,
    moment_matching: bool,
    schemes: [DiscretisationScheme; 4],
    variance_floor: VarianceFloor,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the grid frequency.
    #[inline]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the seed mode.
    #[inline]
    pub fn seed_mode(&self) -> SeedMode {
        self.seed_mode
    }

    /// Whether paths are paired antithetically.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Whether normal shocks are standardised across paths per step.
    #[inline]
    pub fn moment_matching(&self) -> bool {
        self.moment_matching
    }

    /// Discretisation scheme for a model family.
    #[inline]
    pub fn scheme(&self, kind: ModelKind) -> DiscretisationScheme {
        self.schemes[kind_index(kind)]
    }

    /// Variance floor of the Euler variance step.
    #[inline]
    pub fn variance_floor(&self) -> VarianceFloor {
        self.variance_floor
    }

    /// Copy of this configuration with another seed mode.
    pub fn with_seed_mode(&self, seed_mode: SeedMode) -> Self {
        Self {
            seed_mode,
            ..self.clone()
        }
    }

    /// Copy of this configuration with another path count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPathCount` if the count is out of range.
    pub fn with_n_paths(&self, n_paths: usize) -> Result<Self, ConfigError> {
        let config = Self {
            n_paths,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - the frequency step is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        self.frequency.validate()
    }
}

fn kind_index(kind: ModelKind) -> usize {
    match kind {
        ModelKind::GeometricBrownianMotion => 0,
        ModelKind::JumpDiffusion => 1,
        ModelKind::StochasticVolatility => 2,
        ModelKind::StochasticVolatilityJumpDiffusion => 3,
    }
}

impl Default for SimulationConfig {
    /// [`DEFAULT_PATHS`] paths with the builder defaults.
    fn default() -> Self {
        Self {
            n_paths: DEFAULT_PATHS,
            frequency: Frequency::default(),
            seed_mode: SeedMode::default(),
            antithetic: false,
            moment_matching: false,
            schemes: [DiscretisationScheme::default(); 4],
            variance_floor: VarianceFloor::default(),
        }
    }
}

/// Builder for [`SimulationConfig`].
///
/// Defaults: weekly grid, fresh seed, no antithetic sampling, no moment
/// matching, exact schemes, full-truncation variance floor. The path
/// count is required.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_paths: Option<usize>,
    frequency: Frequency,
    seed_mode: SeedMode,
    antithetic: bool,
    moment_matching: bool,
    schemes: [DiscretisationScheme; 4],
    variance_floor: VarianceFloor,
}

impl SimulationConfigBuilder {
    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the grid frequency.
    #[inline]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the seed mode.
    #[inline]
    pub fn seed_mode(mut self, seed_mode: SeedMode) -> Self {
        self.seed_mode = seed_mode;
        self
    }

    /// Shorthand for `seed_mode(SeedMode::Fixed(seed))`.
    #[inline]
    pub fn seed(self, seed: u64) -> Self {
        self.seed_mode(SeedMode::Fixed(seed))
    }

    /// Enables antithetic pairing.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Enables moment matching of the normal shocks.
    #[inline]
    pub fn moment_matching(mut self, moment_matching: bool) -> Self {
        self.moment_matching = moment_matching;
        self
    }

    /// Sets the scheme for one model family.
    #[inline]
    pub fn scheme(mut self, kind: ModelKind, scheme: DiscretisationScheme) -> Self {
        self.schemes[kind_index(kind)] = scheme;
        self
    }

    /// Sets the variance floor.
    #[inline]
    pub fn variance_floor(mut self, floor: VarianceFloor) -> Self {
        self.variance_floor = floor;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` is not set or any field is invalid.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_paths,
            frequency: self.frequency,
            seed_mode: self.seed_mode,
            antithetic: self.antithetic,
            moment_matching: self.moment_matching,
            schemes: self.schemes,
            variance_floor: self.variance_floor,
        };

        config.validate()?;
        Ok(config)
    }
}
