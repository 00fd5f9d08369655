//! # pricer_core: Foundation of the Valuation Core
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - The shared error taxonomy: `PricingError`, `DateError` (`types::error`)
//! - Time types: `Date`, `DayCountConvention` (`types::time`)
//! - Currency tags: `Currency` (`types::currency`)
//! - Discounting: `YieldCurve`, `FlatCurve` (`market_data::curves`)
//! - Numerical quadrature: `GaussLegendre` (`math::quadrature`)
//!
//! Layer 1 has no dependencies on other pricer_* crates.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
//! use pricer_core::math::quadrature::GaussLegendre;
//! use pricer_core::types::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2015, 1, 1).unwrap();
//! let end = Date::from_ymd(2015, 3, 31).unwrap();
//! let t = DayCountConvention::Actual365Fixed.year_fraction_dates(start, end);
//!
//! let curve = FlatCurve::new(0.01_f64);
//! let df = curve.discount_factor(t).unwrap();
//! assert!(df < 1.0);
//!
//! let rule = GaussLegendre::new(16).unwrap();
//! let area = rule.integrate(|x| x * x, 0.0, 3.0);
//! assert!((area - 9.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for Date, Currency, DayCountConvention and FlatCurve

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
