//! Closed-form European option prices.
//!
//! - [`BlackScholes`] for lognormal dynamics
//! - [`merton_series_call`] / [`merton_series_put`] for Merton
//!   jump-diffusion as a Poisson mixture of Black-Scholes prices
//!
//! These serve as independent references for the Fourier and Monte Carlo
//! engines.

mod black_scholes;
mod distributions;
mod error;
mod merton;

pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use merton::{merton_series_call, merton_series_put, MertonJumps};
