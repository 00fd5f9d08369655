//! # Pricer Models (L2: Business Logic)
//!
//! Market states, stochastic models and contract definitions.
//!
//! This crate provides:
//! - [`models::MarketState`]: immutable parameter snapshot for one risk factor
//! - Characteristic functions for GBM, Merton, Heston and Bates dynamics
//! - [`fourier::FourierPricer`]: Lewis and Carr-Madan European pricing
//! - Closed-form Black-Scholes and Merton series prices for validation
//! - Correlation matrices with PSD-tolerant Cholesky factorisation
//! - [`instruments::ContractSpec`] with typed payoff functionals
//!
//! ## Design Principles
//!
//! - **Copy-on-write market states**: perturbations return new snapshots
//! - **Enum-based dispatch** over model families and payoffs
//! - **Builder pattern** for ergonomic construction with validation

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod fourier;
pub mod instruments;
pub mod models;
