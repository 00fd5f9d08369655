//! Portfolio command implementation
//!
//! Values a portfolio described in a TOML file and runs the risk sweeps it
//! lists.

use std::path::Path;

use pricer_risk::portfolio::{Portfolio, PortfolioValuation};
use pricer_risk::scenarios::RiskReport;
use serde::Serialize;
use tracing::info;

use crate::config::{PortfolioFile, RiskSection};
use crate::error::{CliError, Result};

/// Output format of the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text tables
    Table,
    /// One JSON document
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            ))),
        }
    }
}

/// Valuation and risk reports of one run.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    /// Base valuation
    pub valuation: PortfolioValuation,
    /// Requested sweeps, in file order
    pub risk: Vec<RiskReport>,
}

/// Value the portfolio and evaluate every sweep of `file`.
pub fn evaluate(file: &PortfolioFile) -> Result<PortfolioReport> {
    let portfolio = file.build_portfolio()?;
    let valuation = portfolio.valuation()?;
    let risk = file
        .risk
        .iter()
        .map(|sweep| sweep_report(&portfolio, sweep))
        .collect::<Result<Vec<_>>>()?;
    Ok(PortfolioReport { valuation, risk })
}

fn sweep_report(portfolio: &Portfolio, sweep: &RiskSection) -> Result<RiskReport> {
    Ok(portfolio.risk_report(&sweep.factor, sweep.parameter()?, &sweep.grid()?)?)
}

/// Run the portfolio command
pub fn run(path: &Path, file: &PortfolioFile, format: OutputFormat) -> Result<()> {
    info!("Starting portfolio valuation...");
    info!("  Portfolio: {}", path.display());
    info!("  Positions: {}", file.positions.len());
    info!("  Monte Carlo paths: {}", file.simulation.paths);

    if file.positions.is_empty() {
        return Err(CliError::Config("portfolio has no positions".to_string()));
    }
    let report = evaluate(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_tables(&report),
    }

    info!("Portfolio valuation complete");
    Ok(())
}

fn print_tables(report: &PortfolioReport) {
    let valuation = &report.valuation;
    println!(
        "\n{:<20} {:>9} {:>12} {:>10} {:>5} {:>14}",
        "Position", "Quantity", "Value", "SE", "Ccy", "Position value"
    );
    println!("{}", "-".repeat(75));
    for row in &valuation.positions {
        println!(
            "{:<20} {:>9.2} {:>12.4} {:>10.4} {:>5} {:>14.4}",
            row.name.to_string(),
            row.quantity,
            row.value,
            row.std_error,
            row.currency.code(),
            row.position_value
        );
    }
    println!("{}", "-".repeat(75));
    println!(
        "{:<20} {:>9} {:>12} {:>10.4} {:>5} {:>14.4}",
        "Total", "", "", valuation.std_error, "", valuation.total
    );
    println!("({} paths, seed {})", valuation.n_paths, valuation.seed);

    for risk in &report.risk {
        println!(
            "\n{} of {} ({} = {:.4}, value {:.4})",
            risk.label, risk.factor, risk.parameter, risk.base_parameter, risk.base_value
        );
        println!("{:>14} {:>16}", risk.parameter.name(), "Portfolio value");
        for point in &risk.points {
            println!("{:>14.4} {:>16.4}", point.parameter_value, point.portfolio_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"
pricing_date = "2015-01-01"

[simulation]
paths = 2000
seed = 11

[[factors]]
name = "gbm"
initial_value = 36.0
volatility = 0.2
short_rate = 0.06

[[positions]]
name = "put"
quantity = 2.0
payoff = "put"
underlyings = ["gbm"]
strike = 40.0
maturity = "2015-12-31"

[[risk]]
factor = "gbm"
parameter = "vol"
low = 0.1
high = 0.3
points = 3
relative = false
"#;

    #[test]
    fn test_evaluate_runs_sweeps() {
        let file: PortfolioFile = FILE.parse().unwrap();
        let report = evaluate(&file).unwrap();
        assert_eq!(report.valuation.positions.len(), 1);
        assert!(report.valuation.total > 0.0);

        let vega = &report.risk[0];
        assert_eq!(vega.label, "Vega");
        assert_eq!(vega.parameter_values().len(), 3);
        let values = vega.portfolio_values();
        assert!(values[0] < values[1] && values[1] < values[2]);
    }

    #[test]
    fn test_report_serialises() {
        let file: PortfolioFile = FILE.parse().unwrap();
        let report = evaluate(&file).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["valuation"]["total"].is_number());
        assert_eq!(json["risk"][0]["factor"], "gbm");
    }

    #[test]
    fn test_unknown_sweep_factor() {
        let file: PortfolioFile = FILE.replace("factor = \"gbm\"", "factor = \"jd\"").parse().unwrap();
        assert!(matches!(evaluate(&file), Err(CliError::Portfolio(_))));
    }

    #[test]
    fn test_output_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
