//! Typed payoff functionals.
//!
//! A payoff is a pure function of the underlying levels observed on a
//! simulated path. The evaluation context is a [`PayoffState`]: the current
//! level of every underlying the contract references, each underlying's
//! path history up to the current time index, and the time itself.
//!
//! Built-in payoffs read the levels positionally, in the order the
//! contract lists its underlyings. [`CustomPayoff`] closures look values up
//! by risk-factor name.
//!
//! # Examples
//!
//! ```
//! use pricer_models::instruments::{CustomPayoff, Payoff, PayoffState};
//!
//! let names = vec!["gbm".to_string()];
//! let history = [100.0, 104.0, 110.0];
//! let histories = [&history[..]];
//! let state = PayoffState::new(&names, &[110.0], &histories, 2, 1.0);
//!
//! assert_eq!(Payoff::Call { strike: 100.0 }.evaluate(&state).unwrap(), 10.0);
//!
//! // Arithmetic-average call expressed as a closure over the history.
//! let asian = Payoff::Custom(CustomPayoff::new("asian", |s: &PayoffState<'_>| {
//!     let path = s.path("gbm").unwrap_or(&[]);
//!     let mean = path.iter().sum::<f64>() / path.len() as f64;
//!     (mean - 100.0).max(0.0)
//! }));
//! assert!((asian.evaluate(&state).unwrap() - 4.666666666666671).abs() < 1e-12);
//! ```

use std::fmt;
use std::sync::Arc;

use super::error::InstrumentError;

/// Read-only view of one path at one time index.
#[derive(Debug, Clone, Copy)]
pub struct PayoffState<'a> {
    names: &'a [String],
    levels: &'a [f64],
    histories: &'a [&'a [f64]],
    step: usize,
    time: f64,
}

impl<'a> PayoffState<'a> {
    /// Create a view.
    ///
    /// `names`, `levels` and `histories` are aligned by underlying; each
    /// history holds at least `step + 1` levels.
    pub fn new(
        names: &'a [String],
        levels: &'a [f64],
        histories: &'a [&'a [f64]],
        step: usize,
        time: f64,
    ) -> Self {
        debug_assert_eq!(names.len(), levels.len());
        debug_assert_eq!(names.len(), histories.len());
        Self {
            names,
            levels,
            histories,
            step,
            time,
        }
    }

    /// Current level of the named underlying.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.levels[i])
    }

    /// History of the named underlying from the pricing date up to and
    /// including the current time index.
    pub fn path(&self, name: &str) -> Option<&'a [f64]> {
        self.index_of(name).map(|i| {
            let h = self.histories[i];
            &h[..(self.step + 1).min(h.len())]
        })
    }

    /// Current levels in contract order.
    #[inline]
    pub fn levels(&self) -> &'a [f64] {
        self.levels
    }

    /// Underlying names in contract order.
    #[inline]
    pub fn names(&self) -> &'a [String] {
        self.names
    }

    /// Time index on the simulation grid.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Year fraction from the pricing date.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

type PayoffFn = dyn Fn(&PayoffState<'_>) -> f64 + Send + Sync;

/// User-supplied payoff closure.
#[derive(Clone)]
pub struct CustomPayoff {
    label: String,
    func: Arc<PayoffFn>,
}

impl CustomPayoff {
    /// Wrap a closure under a descriptive label.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&PayoffState<'_>) -> f64 + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Descriptive label.
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    fn call(&self, state: &PayoffState<'_>) -> f64 {
        (self.func)(state)
    }
}

impl fmt::Debug for CustomPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPayoff")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomPayoff {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Payoff functional of a contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Payoff {
    /// `max(S - K, 0)` on the single underlying.
    Call {
        /// Strike
        strike: f64,
    },
    /// `max(K - S, 0)` on the single underlying.
    Put {
        /// Strike
        strike: f64,
    },
    /// Best-of call, `max(max_i S_i - K, 0)`.
    MaxCall {
        /// Strike
        strike: f64,
    },
    /// Worst-of put, `max(K - min_i S_i, 0)`.
    MinPut {
        /// Strike
        strike: f64,
    },
    /// `max(sum_i w_i S_i - K, 0)`.
    BasketCall {
        /// Weights aligned with the contract's underlyings
        weights: Vec<f64>,
        /// Strike
        strike: f64,
    },
    /// `max(K - sum_i w_i S_i, 0)`.
    BasketPut {
        /// Weights aligned with the contract's underlyings
        weights: Vec<f64>,
        /// Strike
        strike: f64,
    },
    /// Arbitrary closure over the payoff state.
    Custom(CustomPayoff),
}

impl Payoff {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Payoff::Call { .. } => "Call",
            Payoff::Put { .. } => "Put",
            Payoff::MaxCall { .. } => "MaxCall",
            Payoff::MinPut { .. } => "MinPut",
            Payoff::BasketCall { .. } => "BasketCall",
            Payoff::BasketPut { .. } => "BasketPut",
            Payoff::Custom(_) => "Custom",
        }
    }

    /// Strike, for the built-in payoffs.
    pub fn strike(&self) -> Option<f64> {
        match self {
            Payoff::Call { strike }
            | Payoff::Put { strike }
            | Payoff::MaxCall { strike }
            | Payoff::MinPut { strike }
            | Payoff::BasketCall { strike, .. }
            | Payoff::BasketPut { strike, .. } => Some(*strike),
            Payoff::Custom(_) => None,
        }
    }

    /// Evaluate on a path state.
    ///
    /// # Errors
    /// - `InstrumentError::MissingUnderlying` if the state carries no levels
    /// - `InstrumentError::InvalidPayoffValue` if the result is negative or
    ///   not finite
    pub fn evaluate(&self, state: &PayoffState<'_>) -> Result<f64, InstrumentError> {
        let levels = state.levels();
        let first = || {
            levels
                .first()
                .copied()
                .ok_or_else(|| InstrumentError::MissingUnderlying(self.name().to_string()))
        };
        let value = match self {
            Payoff::Call { strike } => (first()? - strike).max(0.0),
            Payoff::Put { strike } => (strike - first()?).max(0.0),
            Payoff::MaxCall { strike } => {
                first()?;
                let best = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (best - strike).max(0.0)
            }
            Payoff::MinPut { strike } => {
                first()?;
                let worst = levels.iter().copied().fold(f64::INFINITY, f64::min);
                (strike - worst).max(0.0)
            }
            Payoff::BasketCall { weights, strike } => (basket(weights, levels) - strike).max(0.0),
            Payoff::BasketPut { weights, strike } => (strike - basket(weights, levels)).max(0.0),
            Payoff::Custom(custom) => custom.call(state),
        };

        if !value.is_finite() || value < 0.0 {
            return Err(InstrumentError::InvalidPayoffValue {
                payoff: self.name(),
                value,
                step: state.step(),
            });
        }
        Ok(value)
    }
}

fn basket(weights: &[f64], levels: &[f64]) -> f64 {
    weights.iter().zip(levels).map(|(w, s)| w * s).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_state<R>(levels: &[f64], f: impl FnOnce(&PayoffState<'_>) -> R) -> R {
        let names: Vec<String> = (0..levels.len()).map(|i| format!("u{}", i)).collect();
        let histories: Vec<&[f64]> = levels.iter().map(std::slice::from_ref).collect();
        let state = PayoffState::new(&names, levels, &histories, 0, 0.5);
        f(&state)
    }

    #[test]
    fn test_vanilla_payoffs() {
        with_state(&[90.0], |s| {
            assert_eq!(Payoff::Call { strike: 100.0 }.evaluate(s).unwrap(), 0.0);
            assert_eq!(Payoff::Put { strike: 100.0 }.evaluate(s).unwrap(), 10.0);
        });
    }

    #[test]
    fn test_rainbow_payoffs() {
        with_state(&[90.0, 120.0, 105.0], |s| {
            assert_eq!(Payoff::MaxCall { strike: 100.0 }.evaluate(s).unwrap(), 20.0);
            assert_eq!(Payoff::MinPut { strike: 100.0 }.evaluate(s).unwrap(), 10.0);
        });
    }

    #[test]
    fn test_basket_payoffs() {
        with_state(&[90.0, 120.0], |s| {
            let call = Payoff::BasketCall {
                weights: vec![0.5, 0.5],
                strike: 100.0,
            };
            assert_eq!(call.evaluate(s).unwrap(), 5.0);
            let put = Payoff::BasketPut {
                weights: vec![0.5, 0.5],
                strike: 110.0,
            };
            assert_eq!(put.evaluate(s).unwrap(), 5.0);
        });
    }

    #[test]
    fn test_custom_payoff_named_lookup() {
        let spread = Payoff::Custom(CustomPayoff::new("spread", |s: &PayoffState<'_>| {
            let a = s.value("u0").unwrap_or(0.0);
            let b = s.value("u1").unwrap_or(0.0);
            (b - a).max(0.0)
        }));
        with_state(&[90.0, 120.0], |s| {
            assert_eq!(spread.evaluate(s).unwrap(), 30.0);
        });
    }

    #[test]
    fn test_negative_custom_payoff_rejected() {
        let forward = Payoff::Custom(CustomPayoff::new("forward", |s: &PayoffState<'_>| {
            s.levels()[0] - 100.0
        }));
        with_state(&[90.0], |s| {
            let err = forward.evaluate(s).unwrap_err();
            assert!(matches!(
                err,
                InstrumentError::InvalidPayoffValue { payoff: "Custom", .. }
            ));
        });
    }

    #[test]
    fn test_nan_payoff_rejected() {
        let nan = Payoff::Custom(CustomPayoff::new("nan", |_: &PayoffState<'_>| f64::NAN));
        with_state(&[90.0], |s| assert!(nan.evaluate(s).is_err()));
    }

    #[test]
    fn test_empty_levels() {
        with_state(&[], |s| {
            assert!(matches!(
                Payoff::Call { strike: 1.0 }.evaluate(s),
                Err(InstrumentError::MissingUnderlying(_))
            ));
        });
    }

    #[test]
    fn test_path_truncated_to_step() {
        let names = vec!["a".to_string()];
        let hist = [1.0, 2.0, 3.0, 4.0];
        let histories = [&hist[..]];
        let state = PayoffState::new(&names, &[2.0], &histories, 1, 0.1);
        assert_eq!(state.path("a").unwrap(), &[1.0, 2.0]);
        assert!(state.path("b").is_none());
    }
}
