//! Numerical building blocks.
//!
//! - [`quadrature`]: Gauss-Legendre rules used by the Fourier pricing engine

pub mod quadrature;
