//! Contract definitions.
//!
//! - [`ContractSpec`]: exercise style, underlyings, maturity, payoff and currency
//! - [`Payoff`]: built-in vanilla, rainbow and basket payoffs plus closures
//! - [`PayoffState`]: the per-path view a payoff is evaluated on
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::Date;
//! use pricer_models::instruments::ContractSpec;
//!
//! let call = ContractSpec::european_call("gbm", 100.0, Date::from_ymd(2015, 3, 31).unwrap()).unwrap();
//! assert_eq!(call.underlyings(), &["gbm".to_string()]);
//! ```

mod contract;
mod error;
mod exercise;
mod payoff;

pub use contract::ContractSpec;
pub use error::InstrumentError;
pub use exercise::ExerciseStyle;
pub use payoff::{CustomPayoff, Payoff, PayoffState};
