//! # Pricer Risk (L4: Application)
//!
//! Portfolio aggregation and parameter risk reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  portfolio/  - Position, Portfolio,     │
//! │                builder, valuation       │
//! │  scenarios/  - sweep grids, reports     │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_pricing (L3)           │
//! │  joint path simulation and valuation    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! A revaluation is a fork-join: all risk factors are simulated once,
//! jointly, then positions are valued in parallel on the shared paths.
//! Risk-report points run in parallel on copy-on-write portfolio copies.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod portfolio;
pub mod scenarios;
