//! Market states and the stochastic models they parameterise.
//!
//! This module provides:
//! - [`MarketState`]: Immutable per-risk-factor snapshot with a validating builder
//! - [`ModelDynamics`]: GBM, Merton, Heston and Bates parameter sets
//! - [`CharacteristicFunction`]: Closed-form characteristic functions per model
//! - [`CorrelationMatrix`]: Cross-factor correlation with PSD-tolerant Cholesky
//!
//! ## Example
//!
//! ```
//! use pricer_core::types::Date;
//! use pricer_models::models::{JumpParams, MarketState, ModelDynamics};
//!
//! let merton = MarketState::builder("jd")
//!     .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
//!     .initial_value(100.0)
//!     .volatility(0.2)
//!     .short_rate(0.05)
//!     .dynamics(ModelDynamics::JumpDiffusion(JumpParams::new(0.75, -0.6, 0.25)))
//!     .build()
//!     .unwrap();
//! assert_eq!(merton.model_kind().name(), "Merton");
//! ```

pub mod characteristic;
pub mod correlation;
pub mod dynamics;
pub mod error;
pub mod market_state;

pub use characteristic::{
    characteristic_function, BatesCharacteristic, CharacteristicFunction, GbmCharacteristic,
    HestonCharacteristic, MertonCharacteristic, ModelCharacteristic,
};
pub use correlation::{CholeskyFactor, CorrelationError, CorrelationMatrix};
pub use dynamics::{JumpParams, MarketParameter, ModelDynamics, ModelKind, VarianceParams};
pub use error::ModelError;
pub use market_state::{MarketState, MarketStateBuilder};
