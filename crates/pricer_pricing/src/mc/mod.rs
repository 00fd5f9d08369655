//! Monte Carlo path generation.
//!
//! # Architecture
//!
//! ```text
//! SimulationConfig ─┐
//! MarketState(s) ───┼─> PathSimulator ─> Vec<PathSet> ─> valuation
//! CholeskyFactor ───┤         ^
//! TimeGrid ─────────┘         └── PathCache (fixed seeds only)
//! ```
//!
//! A [`TimeGrid`] runs from the pricing date to the last date of interest
//! at a [`Frequency`], with extra dates (maturities) merged in. The
//! [`PathSimulator`] draws one [`PathSet`] per risk factor; asset shocks
//! of different factors are correlated through a Cholesky factor.
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::types::Date;
//! use pricer_models::models::{MarketState, ModelDynamics, VarianceParams};
//! use pricer_pricing::mc::{DiscretisationScheme, Frequency, PathSimulator, SimulationConfig, TimeGrid};
//! use pricer_models::models::ModelKind;
//!
//! let start = Date::from_ymd(2015, 1, 1).unwrap();
//! let heston = MarketState::builder("sv")
//!     .pricing_date(start)
//!     .initial_value(100.0)
//!     .volatility(0.2)
//!     .short_rate(0.05)
//!     .dynamics(ModelDynamics::StochasticVolatility(VarianceParams::new(2.0, 0.04, 0.3, -0.7)))
//!     .build()
//!     .unwrap();
//!
//! let config = SimulationConfig::builder()
//!     .n_paths(2_000)
//!     .frequency(Frequency::Weekly)
//!     .seed(42)
//!     .antithetic(true)
//!     .scheme(ModelKind::StochasticVolatility, DiscretisationScheme::Euler)
//!     .build()
//!     .unwrap();
//! let grid = TimeGrid::new(start, Date::from_ymd(2015, 12, 31).unwrap(), config.frequency(), &[], heston.day_count())
//!     .unwrap();
//!
//! let paths = PathSimulator::new(config).unwrap().simulate(&heston, &grid).unwrap();
//! assert!(paths.has_variance());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod grid;
pub mod paths;
pub mod simulation;

pub use cache::{fingerprint, PathCache};
pub use config::{
    DiscretisationScheme, Frequency, SimulationConfig, SimulationConfigBuilder, VarianceFloor, DEFAULT_PATHS, MAX_PATHS,
};
pub use error::ConfigError;
pub use grid::TimeGrid;
pub use paths::PathSet;
pub use simulation::PathSimulator;
