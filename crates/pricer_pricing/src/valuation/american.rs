//! Longstaff-Schwartz valuation of early exercise.
//!
//! Walking backward from maturity, the continuation value at each grid
//! point is the least-squares projection of the discounted realised cash
//! flows onto a polynomial basis of the current underlying levels. A path
//! exercises when its immediate payoff is positive and exceeds the fitted
//! continuation value; its cash flow then moves to the earlier date.
//!
//! The basis for `n` underlyings and degree `d` is
//! `1, x_i, x_i^2, ..., x_i^d` for each `i` plus the cross products
//! `x_i x_j` for `i < j`, where `x_i = S_i / S_i(0)`.

use nalgebra::{DMatrix, DVector};
use pricer_core::types::PricingError;
use pricer_models::models::MarketState;
use rayon::prelude::*;
use tracing::debug;

use super::view::ContractPaths;

/// Highest supported polynomial degree.
pub const MAX_DEGREE: usize = 8;

const SVD_TOLERANCE: f64 = 1e-12;

/// Regression settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsmConfig {
    degree: usize,
    in_the_money_only: bool,
}

impl Default for LsmConfig {
    fn default() -> Self {
        Self {
            degree: 3,
            in_the_money_only: false,
        }
    }
}

impl LsmConfig {
    /// Regression with polynomial `degree` in `1..=MAX_DEGREE`.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidConfig` for a degree outside the range.
    pub fn new(degree: usize, in_the_money_only: bool) -> Result<Self, PricingError> {
        if degree == 0 || degree > MAX_DEGREE {
            return Err(PricingError::InvalidConfig(format!(
                "regression degree must be in 1..={}, got {}",
                MAX_DEGREE, degree
            )));
        }
        Ok(Self {
            degree,
            in_the_money_only,
        })
    }

    /// Polynomial degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Whether only in-the-money paths enter the regression.
    #[inline]
    pub fn in_the_money_only(&self) -> bool {
        self.in_the_money_only
    }

    /// Number of basis functions for `n_underlyings` factors.
    pub fn basis_size(&self, n_underlyings: usize) -> usize {
        1 + n_underlyings * self.degree + n_underlyings * n_underlyings.saturating_sub(1) / 2
    }
}

fn basis(x: &[f64], degree: usize, out: &mut Vec<f64>) {
    out.clear();
    out.push(1.0);
    for &xi in x {
        let mut power = 1.0;
        for _ in 0..degree {
            power *= xi;
            out.push(power);
        }
    }
    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            out.push(x[i] * x[j]);
        }
    }
}

/// Per-path cash flows discounted to the pricing date.
pub(crate) fn path_values(
    paths: &ContractPaths<'_>,
    discounting: &MarketState,
    config: &LsmConfig,
) -> Result<Vec<f64>, PricingError> {
    let n_paths = paths.n_paths();
    let m = paths.maturity_index();
    let n_basis = config.basis_size(paths.n_underlyings());
    let discount = (0..=m)
        .map(|k| discounting.discount_factor(paths.time(k)))
        .collect::<Result<Vec<_>, _>>()?;
    let scale: Vec<f64> = (0..paths.n_underlyings())
        .map(|i| {
            let s0 = paths.initial_level(i);
            if s0 > 0.0 {
                1.0 / s0
            } else {
                1.0
            }
        })
        .collect();

    let mut cash = (0..n_paths)
        .into_par_iter()
        .map(|p| paths.payoff(p, m))
        .collect::<Result<Vec<_>, _>>()?;
    let mut exercise_at = vec![m; n_paths];

    for k in (1..m).rev() {
        let immediate = (0..n_paths)
            .into_par_iter()
            .map(|p| paths.payoff(p, k))
            .collect::<Result<Vec<_>, _>>()?;
        let rows: Vec<usize> = (0..n_paths)
            .filter(|&p| !config.in_the_money_only() || immediate[p] > 0.0)
            .collect();
        if rows.len() <= n_basis {
            continue;
        }

        let features = |p: usize, buf: &mut Vec<f64>| {
            let x: Vec<f64> = (0..paths.n_underlyings())
                .map(|i| paths.level(i, p, k) * scale[i])
                .collect();
            basis(&x, config.degree(), buf);
        };

        let (xtx, xty) = rows
            .par_iter()
            .fold(
                || (DMatrix::<f64>::zeros(n_basis, n_basis), DVector::<f64>::zeros(n_basis), Vec::new()),
                |(mut xtx, mut xty, mut buf), &p| {
                    features(p, &mut buf);
                    let y = cash[p] * discount[exercise_at[p]] / discount[k];
                    for a in 0..n_basis {
                        xty[a] += buf[a] * y;
                        for b in a..n_basis {
                            xtx[(a, b)] += buf[a] * buf[b];
                        }
                    }
                    (xtx, xty, buf)
                },
            )
            .map(|(xtx, xty, _)| (xtx, xty))
            .reduce(
                || (DMatrix::zeros(n_basis, n_basis), DVector::zeros(n_basis)),
                |(a, b), (c, d)| (a + c, b + d),
            );
        let xtx = DMatrix::from_fn(n_basis, n_basis, |a, b| {
            if a <= b {
                xtx[(a, b)]
            } else {
                xtx[(b, a)]
            }
        });

        let beta = match xtx.svd(true, true).solve(&xty, SVD_TOLERANCE) {
            Ok(beta) => beta,
            Err(reason) => {
                debug!(step = k, reason, "regression failed, no exercise at this date");
                continue;
            }
        };

        let decisions: Vec<bool> = (0..n_paths)
            .into_par_iter()
            .map_init(Vec::new, |buf, p| {
                if immediate[p] <= 0.0 {
                    return false;
                }
                features(p, buf);
                let continuation: f64 = buf.iter().zip(beta.iter()).map(|(f, b)| f * b).sum();
                immediate[p] > continuation
            })
            .collect();
        for (p, exercise) in decisions.into_iter().enumerate() {
            if exercise {
                cash[p] = immediate[p];
                exercise_at[p] = k;
            }
        }
    }

    Ok(cash
        .iter()
        .zip(&exercise_at)
        .map(|(c, &k)| c * discount[k])
        .collect())
}
