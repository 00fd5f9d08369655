//! Instrument valuation on simulated paths.
//!
//! European contracts average the discounted maturity payoff over paths.
//! American contracts use Longstaff-Schwartz regression (see
//! [`LsmConfig`]). Multi-underlying contracts read the jointly simulated
//! paths of every underlying; correlation is injected at simulation time,
//! not here. [`fourier_value`] wraps the Fourier engine in the same
//! [`ValuationResult`] shape for side-by-side comparisons.

mod american;
mod engine;
mod european;
mod result;
mod view;

pub use american::{LsmConfig, MAX_DEGREE};
pub use engine::{fourier_value, MonteCarloEngine};
pub use result::{mean_and_std_error, ValuationInputs, ValuationMethod, ValuationResult};
