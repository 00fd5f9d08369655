//! # Pricer Monte Carlo (Layer 3)
//!
//! Path simulation and instrument valuation for the valuation core.
//!
//! - [`rng`]: seeded generators and per-path seed derivation
//! - [`mc`]: simulation configuration, time grids, the path simulation
//!   engine and the fixed-seed path cache
//! - [`valuation`]: European, American (Longstaff-Schwartz) and
//!   multi-underlying valuation on simulated paths
//!
//! ## Reproducibility
//!
//! Every path draws from its own generator, seeded from the base seed, the
//! risk-factor name and the path index. Results under a fixed seed are
//! therefore bit-identical regardless of how rayon schedules the work.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::Date;
//! use pricer_models::instruments::ContractSpec;
//! use pricer_models::models::MarketState;
//! use pricer_pricing::mc::SimulationConfig;
//! use pricer_pricing::valuation::MonteCarloEngine;
//!
//! let state = MarketState::builder("gbm")
//!     .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
//!     .initial_value(36.0)
//!     .volatility(0.2)
//!     .short_rate(0.06)
//!     .build()
//!     .unwrap();
//! let put = ContractSpec::american_put("gbm", 40.0, Date::from_ymd(2015, 12, 31).unwrap()).unwrap();
//!
//! let config = SimulationConfig::builder().n_paths(5_000).seed(7).build().unwrap();
//! let result = MonteCarloEngine::new(config).unwrap().present_value(&state, &put).unwrap();
//! assert!(result.value > 4.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;
pub mod valuation;
