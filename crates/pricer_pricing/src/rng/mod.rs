//! # Random Number Generation
//!
//! - [`PricerRng`]: seeded generator for normal and Poisson draws
//! - [`SeedMode`]: fixed or fresh base seeds
//! - [`derive_path_seed`]: reproducible per-path seeds independent of
//!   thread scheduling
//!
//! ```rust
//! use pricer_pricing::rng::{derive_path_seed, PricerRng};
//!
//! let mut rng = PricerRng::from_seed(derive_path_seed(12345, "gbm", 0));
//! let z = rng.gen_normal();
//! assert!(z.is_finite());
//! ```

mod prng;
mod seed;

pub use prng::PricerRng;
pub use seed::{derive_path_seed, fnv1a, splitmix64, SeedMode};
