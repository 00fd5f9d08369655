//! Fourier engine configuration.

use pricer_core::math::quadrature::MAX_ORDER;
use pricer_core::types::PricingError;

/// Default Carr-Madan damping exponent.
pub const DEFAULT_DAMPING: f64 = 1.5;

/// Transform used to express the option price as a real integral.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FourierMethod {
    /// Lewis (2001) single integral along `Im(u) = -1/2`.
    #[default]
    Lewis,
    /// Carr-Madan (1999) transform of the damped call price.
    CarrMadan {
        /// Damping exponent, `> 0`
        alpha: f64,
    },
}

impl FourierMethod {
    /// Carr-Madan with the default damping.
    pub fn carr_madan() -> Self {
        FourierMethod::CarrMadan {
            alpha: DEFAULT_DAMPING,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            FourierMethod::Lewis => "Lewis",
            FourierMethod::CarrMadan { .. } => "Carr-Madan",
        }
    }
}

/// Quadrature and truncation settings.
///
/// The frequency axis `[0, bound]` is split into panels of
/// `panel_width`, each integrated with a `nodes`-point Gauss-Legendre
/// rule. The bound starts at `initial_bound` and doubles while the
/// integrand magnitude over the outermost panel is at least `tolerance`.
///
/// # Examples
/// ```
/// use pricer_models::fourier::{FourierConfig, FourierMethod};
///
/// let config = FourierConfig::default()
///     .with_method(FourierMethod::carr_madan())
///     .with_max_bound(1_600.0);
/// assert!(config.validate().is_ok());
///
/// let bad = FourierConfig::default().with_max_bound(10.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FourierConfig {
    /// Integration method
    pub method: FourierMethod,
    /// First truncation bound
    pub initial_bound: f64,
    /// Largest truncation bound before giving up
    pub max_bound: f64,
    /// Width of each quadrature panel
    pub panel_width: f64,
    /// Gauss-Legendre points per panel
    pub nodes: usize,
    /// Integrand magnitude regarded as negligible
    pub tolerance: f64,
}

impl Default for FourierConfig {
    fn default() -> Self {
        Self {
            method: FourierMethod::default(),
            initial_bound: 100.0,
            max_bound: 25_600.0,
            panel_width: 5.0,
            nodes: 16,
            tolerance: 1e-10,
        }
    }
}

impl FourierConfig {
    /// Set the method.
    pub fn with_method(mut self, method: FourierMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the first truncation bound.
    pub fn with_initial_bound(mut self, bound: f64) -> Self {
        self.initial_bound = bound;
        self
    }

    /// Set the largest truncation bound.
    pub fn with_max_bound(mut self, bound: f64) -> Self {
        self.max_bound = bound;
        self
    }

    /// Set the panel width.
    pub fn with_panel_width(mut self, width: f64) -> Self {
        self.panel_width = width;
        self
    }

    /// Set the rule order.
    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    /// Set the decay tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    /// `PricingError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<(), PricingError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.initial_bound) {
            return Err(invalid("initial_bound must be positive"));
        }
        if !positive(self.max_bound) || self.max_bound < self.initial_bound {
            return Err(invalid("max_bound must be at least initial_bound"));
        }
        if !positive(self.panel_width) || self.panel_width > self.initial_bound {
            return Err(invalid("panel_width must be positive and at most initial_bound"));
        }
        if self.nodes == 0 || self.nodes > MAX_ORDER {
            return Err(invalid(&format!("nodes must be in 1..={}", MAX_ORDER)));
        }
        if !positive(self.tolerance) {
            return Err(invalid("tolerance must be positive"));
        }
        if let FourierMethod::CarrMadan { alpha } = self.method {
            if !positive(alpha) {
                return Err(invalid("Carr-Madan damping must be positive"));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> PricingError {
    PricingError::InvalidConfig(format!("Fourier: {}", message))
}
