//! Parameter risk reports.
//!
//! - [`SweepGrid`]: absolute values or multiples of the base parameter
//! - [`RiskReport`]: ordered (parameter value, portfolio value) series
//!   with the base case
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::types::Date;
//! use pricer_models::instruments::ContractSpec;
//! use pricer_models::models::{MarketParameter, MarketState};
//! use pricer_pricing::mc::SimulationConfig;
//! use pricer_risk::portfolio::{Portfolio, Position};
//! use pricer_risk::scenarios::SweepGrid;
//!
//! let gbm = Arc::new(
//!     MarketState::builder("gbm")
//!         .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
//!         .initial_value(36.0)
//!         .volatility(0.2)
//!         .short_rate(0.06)
//!         .build()
//!         .unwrap(),
//! );
//! let call = ContractSpec::european_call("gbm", 36.0, Date::from_ymd(2015, 12, 31).unwrap()).unwrap();
//! let portfolio = Portfolio::builder()
//!     .add_position("call", Position::new(1.0, call, vec![gbm]).unwrap())
//!     .simulation(SimulationConfig::builder().n_paths(2_000).seed(3).build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let grid = SweepGrid::relative_range(0.8, 1.2, 3).unwrap();
//! let report = portfolio.risk_report("gbm", MarketParameter::InitialValue, &grid).unwrap();
//! assert_eq!(report.label, "Delta");
//! let values = report.portfolio_values();
//! assert!(values[0] < values[1] && values[1] < values[2]);
//! ```

mod report;
mod sweep;

pub use report::{RiskPoint, RiskReport};
pub use sweep::{sensitivity_label, SweepGrid};
