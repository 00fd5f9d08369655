//! Fourier pricing of European calls and puts.
//!
//! Prices are obtained by integrating a transform of the model's
//! characteristic function along the real frequency axis with composite
//! Gauss-Legendre quadrature. The truncation bound is extended until the
//! integrand is negligible; if it never is, pricing fails with
//! [`PricingError::IntegrationDivergence`](pricer_core::types::PricingError::IntegrationDivergence).

mod config;
mod engine;
mod integrand;

pub use config::{FourierConfig, FourierMethod, DEFAULT_DAMPING};
pub use engine::FourierPricer;
