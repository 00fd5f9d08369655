//! Gauss-Legendre quadrature.
//!
//! Nodes are the roots of the Legendre polynomial P_n on [-1, 1], found by
//! Newton iteration from the Chebyshev-like initial guess
//! `cos(pi (i + 0.75) / (n + 0.5))`. Weights are
//! `w_i = 2 / ((1 - x_i^2) P_n'(x_i)^2)`.
//!
//! A rule is computed once and reused across every panel of a composite
//! integration, which is how the Fourier engine covers a long truncated
//! frequency axis.

use crate::types::PricingError;
use std::f64::consts::PI;

/// Upper bound on the number of Newton steps per root.
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Largest supported rule order.
pub const MAX_ORDER: usize = 256;

/// An `n`-point Gauss-Legendre rule on [-1, 1].
///
/// # Examples
///
/// ```
/// use pricer_core::math::quadrature::GaussLegendre;
///
/// let rule = GaussLegendre::new(8).unwrap();
/// // Exact for polynomials up to degree 2n - 1.
/// let v = rule.integrate(|x| x.powi(15) + 1.0, -1.0, 1.0);
/// assert!((v - 2.0).abs() < 1e-13);
///
/// let e = rule.integrate_composite(f64::exp, 0.0, 10.0, 20);
/// assert!((e - (10.0_f64.exp() - 1.0)).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Build an `n`-point rule.
    ///
    /// # Errors
    /// `PricingError::InvalidConfig` if `n` is zero or exceeds [`MAX_ORDER`].
    pub fn new(n: usize) -> Result<Self, PricingError> {
        if n == 0 || n > MAX_ORDER {
            return Err(PricingError::InvalidConfig(format!(
                "Gauss-Legendre order must be in [1, {}], got {}",
                MAX_ORDER, n
            )));
        }

        let mut nodes = vec![0.0_f64; n];
        let mut weights = vec![0.0_f64; n];
        let nf = n as f64;

        for i in 0..n.div_ceil(2) {
            let mut x = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            for _ in 0..MAX_NEWTON_ITERATIONS {
                let (p, dp) = legendre(n, x);
                let step = p / dp;
                x -= step;
                if step.abs() < 1e-15 {
                    break;
                }
            }
            let (_, dp) = legendre(n, x);
            let w = 2.0 / ((1.0 - x * x) * dp * dp);

            nodes[i] = -x;
            nodes[n - 1 - i] = x;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }

        Ok(Self { nodes, weights })
    }

    /// Number of points.
    #[inline]
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes on [-1, 1], ascending.
    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights matching [`nodes`](Self::nodes).
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrate `f` over `[a, b]` with a single application of the rule.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        let sum: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(half * x + mid))
            .sum();
        half * sum
    }

    /// Integrate `f` over `[a, b]` split into `panels` equal sub-intervals.
    pub fn integrate_composite<F>(&self, f: F, a: f64, b: f64, panels: usize) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let panels = panels.max(1);
        let width = (b - a) / panels as f64;
        (0..panels)
            .map(|k| {
                let lo = a + k as f64 * width;
                self.integrate(&f, lo, lo + width)
            })
            .sum()
    }
}

/// P_n(x) and P_n'(x) by the three-term recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let kf = k as f64;
        let next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = next;
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}
