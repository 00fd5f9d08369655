//! Discount curve abstractions.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for discount factor and rate calculations
//! - [`FlatCurve`]: Constant short-rate curve used by every market state

mod flat;
mod traits;

pub use flat::FlatCurve;
pub use traits::YieldCurve;
