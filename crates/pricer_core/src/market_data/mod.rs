//! Market data used for discounting.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and the constant-rate [`FlatCurve`](curves::FlatCurve)
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
//!
//! let curve = FlatCurve::new(0.05_f64);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod error;

pub use curves::{FlatCurve, YieldCurve};
pub use error::MarketDataError;
