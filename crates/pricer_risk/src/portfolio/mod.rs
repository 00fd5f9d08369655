//! Portfolio structures and aggregation.
//!
//! - [`Position`]: a quantity of one contract on shared market states
//! - [`Portfolio`] / [`PortfolioBuilder`]: named positions, the correlation
//!   of their risk factors and the simulation settings
//! - [`PortfolioValuation`]: per-position rows and the aggregated total

mod builder;
mod error;
mod ids;
#[allow(clippy::module_inception)]
mod portfolio;
mod position;

pub use builder::PortfolioBuilder;
pub use error::PortfolioError;
pub use ids::PositionId;
pub use portfolio::{CorrelationSpec, Portfolio, PortfolioValuation, PositionValue};
pub use position::Position;
