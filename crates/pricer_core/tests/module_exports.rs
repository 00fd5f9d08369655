//! Integration tests for module exports.
//!
//! Verify that public modules and types are reachable via absolute paths
//! and compose the way the upper layers use them.

/// Dates and day counts produce the year fraction used for discounting.
#[test]
fn test_time_and_curve_exports() {
    use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
    use pricer_core::types::{Date, DayCountConvention};

    let pricing = Date::from_ymd(2015, 1, 1).unwrap();
    let maturity = Date::from_ymd(2015, 3, 31).unwrap();
    let t = DayCountConvention::default().year_fraction_dates(pricing, maturity);

    let curve = FlatCurve::new(0.01_f64);
    let df = curve.discount_factor(t).unwrap();
    assert!((df - (-0.01 * 89.0 / 365.0_f64).exp()).abs() < 1e-15);
}

/// Layer errors convert into the shared taxonomy with `?`.
#[test]
fn test_error_conversions() {
    use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
    use pricer_core::types::{Date, PricingError};

    fn discount_to(date: &str) -> Result<f64, PricingError> {
        let pricing = Date::from_ymd(2015, 1, 1)?;
        let target = Date::parse(date)?;
        let t = (target - pricing) as f64 / 365.0;
        Ok(FlatCurve::new(0.01).discount_factor(t)?)
    }

    assert!(discount_to("2016-01-01").is_ok());
    assert!(matches!(
        discount_to("not-a-date"),
        Err(PricingError::InvalidConfig(_))
    ));
    assert!(matches!(
        discount_to("2014-01-01"),
        Err(PricingError::InvalidMarketState(_))
    ));
}

/// Quadrature is reachable and accurate on a smooth integrand.
#[test]
fn test_quadrature_exports() {
    use pricer_core::math::quadrature::GaussLegendre;

    let rule = GaussLegendre::new(32).unwrap();
    assert_eq!(rule.order(), 32);
    let gaussian = rule.integrate_composite(|x| (-0.5 * x * x).exp(), -10.0, 10.0, 8);
    assert!((gaussian - (2.0 * std::f64::consts::PI).sqrt()).abs() < 1e-12);
}
