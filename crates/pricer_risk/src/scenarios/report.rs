//! Risk reports: portfolio value along a parameter sweep.
//!
//! Each grid point revalues a copy of the portfolio whose named factor
//! carries the overridden parameter; the portfolio itself is never
//! mutated, so points are independent and run in parallel.

use pricer_models::models::MarketParameter;
use rayon::prelude::*;
use tracing::{debug, info};

use super::sweep::{sensitivity_label, SweepGrid};
use crate::portfolio::{Portfolio, PortfolioError};

/// One evaluated sweep point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskPoint {
    /// Overridden parameter value.
    pub parameter_value: f64,
    /// Portfolio value under the override.
    pub portfolio_value: f64,
}

/// Portfolio value as a function of one factor parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskReport {
    /// Swept risk factor.
    pub factor: String,
    /// Swept parameter.
    pub parameter: MarketParameter,
    /// `Delta`, `Vega` or the parameter name.
    pub label: String,
    /// Unperturbed parameter value.
    pub base_parameter: f64,
    /// Unperturbed portfolio value.
    pub base_value: f64,
    /// Evaluated points ordered by parameter value.
    pub points: Vec<RiskPoint>,
}

impl RiskReport {
    /// Parameter values in report order.
    pub fn parameter_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.parameter_value).collect()
    }

    /// Portfolio values in report order.
    pub fn portfolio_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.portfolio_value).collect()
    }
}

impl Portfolio {
    /// Sweep `parameter` of risk factor `factor` over `grid`.
    ///
    /// # Errors
    ///
    /// - `UnknownRiskFactor` if no position references `factor`
    /// - `Pricing(InvalidMarketState)` if the parameter does not apply to
    ///   the factor's dynamics or a grid value is invalid
    /// - any valuation error of the base case or a grid point
    pub fn risk_report(
        &self,
        factor: &str,
        parameter: MarketParameter,
        grid: &SweepGrid,
    ) -> Result<RiskReport, PortfolioError> {
        let state = self
            .factor(factor)
            .ok_or_else(|| PortfolioError::UnknownRiskFactor(factor.to_string()))?;
        let base_parameter = state.parameter(parameter)?;
        let values = grid.values(base_parameter);
        let label = sensitivity_label(parameter);
        info!(factor, %parameter, label, points = values.len(), "risk report");

        let base_value = self.total_value()?;
        let mut points = values
            .par_iter()
            .map(|&value| {
                let portfolio_value = self
                    .with_factor_parameter(factor, parameter, value)?
                    .total_value()?;
                debug!(factor, %parameter, value, portfolio_value, "sweep point");
                Ok(RiskPoint {
                    parameter_value: value,
                    portfolio_value,
                })
            })
            .collect::<Result<Vec<_>, PortfolioError>>()?;
        points.sort_by(|a, b| a.parameter_value.total_cmp(&b.parameter_value));

        Ok(RiskReport {
            factor: factor.to_string(),
            parameter,
            label: label.to_string(),
            base_parameter,
            base_value,
            points,
        })
    }

    /// Risk reports for several parameters of one factor.
    pub fn risk_reports(
        &self,
        factor: &str,
        parameters: &[MarketParameter],
        grid: &SweepGrid,
    ) -> Result<Vec<RiskReport>, PortfolioError> {
        parameters
            .iter()
            .map(|&p| self.risk_report(factor, p, grid))
            .collect()
    }
}
