//! Parameter sweep grids.

use pricer_models::models::MarketParameter;

/// Parameter values a risk report visits.
///
/// # Examples
///
/// ```
/// use pricer_risk::scenarios::SweepGrid;
///
/// let grid = SweepGrid::relative_range(0.8, 1.2, 5).unwrap();
/// let values = grid.values(36.0);
/// assert_eq!(values.len(), 5);
/// assert!((values[0] - 28.8).abs() < 1e-12);
/// assert!((values[4] - 43.2).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "points", rename_all = "snake_case"))]
pub enum SweepGrid {
    /// Parameter values as given.
    Absolute(Vec<f64>),
    /// Multiples of the base parameter value.
    Relative(Vec<f64>),
}

impl SweepGrid {
    /// `n` evenly spaced multiples from `low` to `high`.
    ///
    /// Returns `None` for `n < 2` or a non-finite or reversed range.
    pub fn relative_range(low: f64, high: f64, n: usize) -> Option<Self> {
        linspace(low, high, n).map(SweepGrid::Relative)
    }

    /// `n` evenly spaced absolute values from `low` to `high`.
    pub fn absolute_range(low: f64, high: f64, n: usize) -> Option<Self> {
        linspace(low, high, n).map(SweepGrid::Absolute)
    }

    /// Parameter values for a base value of `base`.
    pub fn values(&self, base: f64) -> Vec<f64> {
        match self {
            SweepGrid::Absolute(points) => points.clone(),
            SweepGrid::Relative(points) => points.iter().map(|m| m * base).collect(),
        }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        match self {
            SweepGrid::Absolute(p) | SweepGrid::Relative(p) => p.len(),
        }
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn linspace(low: f64, high: f64, n: usize) -> Option<Vec<f64>> {
    if n < 2 || !low.is_finite() || !high.is_finite() || high < low {
        return None;
    }
    let step = (high - low) / (n - 1) as f64;
    Some((0..n).map(|i| low + step * i as f64).collect())
}

/// Greek-like label of a swept parameter.
pub fn sensitivity_label(parameter: MarketParameter) -> &'static str {
    match parameter {
        MarketParameter::InitialValue => "Delta",
        MarketParameter::Volatility => "Vega",
        other => other.name(),
    }
}
