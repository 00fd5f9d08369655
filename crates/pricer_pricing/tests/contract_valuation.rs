//! End-to-end Monte Carlo valuation of the non-vanilla contract and scheme
//! variants.

use approx::assert_relative_eq;
use pricer_core::types::Date;
use pricer_models::fourier::{FourierConfig, FourierPricer};
use pricer_models::instruments::{ContractSpec, CustomPayoff, ExerciseStyle, Payoff, PayoffState};
use pricer_models::models::{
    CorrelationMatrix, JumpParams, MarketState, ModelDynamics, ModelKind, VarianceParams,
};
use pricer_pricing::mc::{DiscretisationScheme, Frequency, SimulationConfig};
use pricer_pricing::valuation::{LsmConfig, MonteCarloEngine, ValuationMethod};

fn pricing_date() -> Date {
    Date::from_ymd(2015, 1, 1).unwrap()
}

fn gbm(name: &str, s0: f64, volatility: f64, rate: f64) -> MarketState {
    MarketState::builder(name)
        .pricing_date(pricing_date())
        .initial_value(s0)
        .volatility(volatility)
        .short_rate(rate)
        .build()
        .unwrap()
}

fn engine(n_paths: usize, seed: u64) -> MonteCarloEngine {
    let config = SimulationConfig::builder()
        .n_paths(n_paths)
        .seed(seed)
        .antithetic(true)
        .build()
        .unwrap();
    MonteCarloEngine::new(config).unwrap()
}

fn pair(rho: f64) -> CorrelationMatrix {
    CorrelationMatrix::from_pairs(2, &[(0, 1, rho)]).unwrap()
}

// ============================================================================
// American exercise
// ============================================================================

#[test]
fn test_american_put_in_the_money_regression() {
    let s = gbm("gbm", 36.0, 0.2, 0.06);
    let maturity = Date::from_ymd(2016, 1, 1).unwrap();
    let put = ContractSpec::american_put("gbm", 40.0, maturity).unwrap();
    let european = ContractSpec::european_put("gbm", 40.0, maturity).unwrap();

    let e = engine(40_000, 2024).with_lsm(LsmConfig::new(3, true).unwrap());
    assert!(e.lsm().in_the_money_only());

    let amer = e.present_value(&s, &put).unwrap();
    let euro = e.present_value(&s, &european).unwrap();
    assert_eq!(amer.inputs.method, ValuationMethod::LeastSquaresMonteCarlo);
    assert!(amer.value > euro.value);
    assert_relative_eq!(amer.value, 4.478, max_relative = 0.03);
}

#[test]
fn test_regression_sets_agree() {
    let s = gbm("gbm", 36.0, 0.2, 0.06);
    let put = ContractSpec::american_put("gbm", 40.0, Date::from_ymd(2016, 1, 1).unwrap()).unwrap();
    let all = engine(20_000, 77).present_value(&s, &put).unwrap();
    let itm = engine(20_000, 77)
        .with_lsm(LsmConfig::new(3, true).unwrap())
        .present_value(&s, &put)
        .unwrap();
    assert!((all.value - itm.value).abs() < 0.02 * all.value + 3.0 * all.std_error);
}

// ============================================================================
// Euler discretisation per model
// ============================================================================

#[test]
fn test_euler_scheme_tracks_fourier_for_every_model() {
    let variance = VarianceParams::new(2.0, 0.04, 0.3, -0.5);
    let jumps = JumpParams::new(0.5, -0.1, 0.1);
    let maturity = pricing_date().add_days(182).unwrap();
    let pricer = FourierPricer::new(FourierConfig::default()).unwrap();

    for (kind, dynamics) in [
        (ModelKind::JumpDiffusion, ModelDynamics::JumpDiffusion(jumps)),
        (ModelKind::StochasticVolatility, ModelDynamics::StochasticVolatility(variance)),
        (
            ModelKind::StochasticVolatilityJumpDiffusion,
            ModelDynamics::StochasticVolatilityJumpDiffusion(variance, jumps),
        ),
    ] {
        let s = MarketState::builder("u")
            .pricing_date(pricing_date())
            .initial_value(100.0)
            .volatility(0.2)
            .short_rate(0.01)
            .dynamics(dynamics)
            .build()
            .unwrap();
        let call = ContractSpec::european_call("u", 100.0, maturity).unwrap();
        let config = SimulationConfig::builder()
            .n_paths(40_000)
            .frequency(Frequency::Daily)
            .seed(5)
            .antithetic(true)
            .scheme(kind, DiscretisationScheme::Euler)
            .build()
            .unwrap();
        assert_eq!(config.scheme(kind), DiscretisationScheme::Euler);

        let exact = pricer.present_value(&s, &call).unwrap();
        let simulated = MonteCarloEngine::new(config).unwrap().present_value(&s, &call).unwrap();
        assert!(
            (simulated.value - exact).abs() < 0.03 * exact + 4.0 * simulated.std_error,
            "{}: euler {} vs fourier {}",
            kind,
            simulated.value,
            exact
        );
    }
}

// ============================================================================
// Custom and multi-underlying payoffs
// ============================================================================

#[test]
fn test_custom_terminal_payoff_matches_call() {
    let s = gbm("u", 100.0, 0.2, 0.01);
    let maturity = Date::from_ymd(2015, 12, 31).unwrap();
    let custom = ContractSpec::new(
        ExerciseStyle::European,
        vec!["u".into()],
        maturity,
        Payoff::Custom(CustomPayoff::new("terminal call", |p: &PayoffState<'_>| {
            (p.value("u").unwrap_or(0.0) - 100.0).max(0.0)
        })),
    )
    .unwrap();
    let call = ContractSpec::european_call("u", 100.0, maturity).unwrap();

    let e = engine(10_000, 8);
    let a = e.present_value(&s, &custom).unwrap();
    let b = e.present_value(&s, &call).unwrap();
    assert_relative_eq!(a.value, b.value, max_relative = 1e-12);
}

#[test]
fn test_arithmetic_asian_on_path_history() {
    let s = gbm("u", 100.0, 0.2, 0.01);
    let maturity = Date::from_ymd(2015, 12, 31).unwrap();
    let average = |p: &PayoffState<'_>| {
        let path = p.path("u").unwrap_or(&[]);
        path.iter().sum::<f64>() / path.len().max(1) as f64
    };
    let geometric_average = |p: &PayoffState<'_>| {
        let path = p.path("u").unwrap_or(&[]);
        (path.iter().map(|x| x.ln()).sum::<f64>() / path.len().max(1) as f64).exp()
    };
    let asian = ContractSpec::new(
        ExerciseStyle::European,
        vec!["u".into()],
        maturity,
        Payoff::Custom(CustomPayoff::new("arithmetic asian", move |p: &PayoffState<'_>| {
            (average(p) - 100.0).max(0.0)
        })),
    )
    .unwrap();
    let geometric = ContractSpec::new(
        ExerciseStyle::European,
        vec!["u".into()],
        maturity,
        Payoff::Custom(CustomPayoff::new("geometric asian", move |p: &PayoffState<'_>| {
            (geometric_average(p) - 100.0).max(0.0)
        })),
    )
    .unwrap();
    let call = ContractSpec::european_call("u", 100.0, maturity).unwrap();

    let e = engine(20_000, 31);
    let arithmetic = e.present_value(&s, &asian).unwrap();
    let geo = e.present_value(&s, &geometric).unwrap();
    let vanilla = e.present_value(&s, &call).unwrap();

    // Arithmetic dominates geometric path by path on identical paths.
    assert!(arithmetic.value >= geo.value);
    assert!(arithmetic.value < vanilla.value);
    assert!(arithmetic.value > 0.4 * vanilla.value);
}

#[test]
fn test_basket_put_on_correlated_paths() {
    let a = gbm("a", 100.0, 0.2, 0.01);
    let b = gbm("b", 100.0, 0.2, 0.01);
    let maturity = Date::from_ymd(2015, 12, 31).unwrap();
    let basket = ContractSpec::new(
        ExerciseStyle::European,
        vec!["a".into(), "b".into()],
        maturity,
        Payoff::BasketPut {
            weights: vec![0.5, 0.5],
            strike: 100.0,
        },
    )
    .unwrap();
    let single = ContractSpec::european_put("a", 100.0, maturity).unwrap();

    let e = engine(20_000, 17);
    let value_at = |rho: f64| e.present_value_correlated(&[&a, &b], &pair(rho), &basket).unwrap();
    let high = value_at(0.9);
    let low = value_at(-0.5);
    assert_eq!(high.inputs.underlyings, vec!["a".to_string(), "b".to_string()]);
    assert!(high.value - low.value > 3.0 * (high.std_error + low.std_error));

    // Perfect correlation collapses the basket onto one factor.
    let one = value_at(1.0);
    let put = e.present_value(&a, &single).unwrap();
    assert!((one.value - put.value).abs() < 4.0 * (one.std_error + put.std_error));
}

#[test]
fn test_worst_of_put_dominates_single_put() {
    let a = gbm("a", 100.0, 0.2, 0.01);
    let b = gbm("b", 100.0, 0.3, 0.01);
    let maturity = Date::from_ymd(2015, 12, 31).unwrap();
    let worst_of = ContractSpec::new(
        ExerciseStyle::European,
        vec!["a".into(), "b".into()],
        maturity,
        Payoff::MinPut { strike: 100.0 },
    )
    .unwrap();
    let on_a = ContractSpec::european_put("a", 100.0, maturity).unwrap();
    let on_b = ContractSpec::european_put("b", 100.0, maturity).unwrap();

    let e = engine(10_000, 4);
    let corr = pair(0.3);
    let value = |c: &ContractSpec| e.present_value_correlated(&[&a, &b], &corr, c).unwrap().value;
    let worst = value(&worst_of);
    assert!(worst >= value(&on_a));
    assert!(worst >= value(&on_b));
}
