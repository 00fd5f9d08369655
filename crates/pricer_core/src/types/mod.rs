//! Core time, currency and error types.
//!
//! This module provides:
//! - `time`: Dates and day-count conventions for year fractions
//! - `currency`: ISO 4217 currency tags carried by contracts and positions
//! - `error`: The pricing error taxonomy shared by every layer
//!
//! # Re-exports
//!
//! - [`Date`], [`DayCountConvention`] from `time`
//! - [`Currency`] from `currency`
//! - [`PricingError`], [`DateError`], [`CurrencyError`] from `error`

pub mod currency;
pub mod error;
pub mod time;

pub use currency::Currency;
pub use error::{CurrencyError, DateError, PricingError};
pub use time::{Date, DayCountConvention};
