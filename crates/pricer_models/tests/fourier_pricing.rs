//! Fourier engine against closed forms and across model nestings.

use approx::assert_relative_eq;
use pricer_core::types::{Date, PricingError};
use pricer_models::analytical::{merton_series_call, merton_series_put, BlackScholes, MertonJumps};
use pricer_models::fourier::{FourierConfig, FourierMethod, FourierPricer};
use pricer_models::instruments::{ContractSpec, ExerciseStyle, Payoff};
use pricer_models::models::{JumpParams, MarketState, ModelDynamics, VarianceParams};
use proptest::prelude::*;

fn pricing_date() -> Date {
    Date::from_ymd(2015, 1, 1).unwrap()
}

fn maturity(days: i64) -> Date {
    pricing_date().add_days(days).unwrap()
}

fn state(name: &str, dynamics: ModelDynamics) -> MarketState {
    MarketState::builder(name)
        .pricing_date(pricing_date())
        .initial_value(100.0)
        .volatility(0.2)
        .short_rate(0.01)
        .dynamics(dynamics)
        .build()
        .unwrap()
}

fn lewis() -> FourierPricer {
    FourierPricer::new(FourierConfig::default()).unwrap()
}

fn carr_madan() -> FourierPricer {
    FourierPricer::new(FourierConfig::default().with_method(FourierMethod::carr_madan())).unwrap()
}

// ============================================================================
// Reference values
// ============================================================================

#[test]
fn test_gbm_reference_values() {
    let gbm = state("gbm", ModelDynamics::GeometricBrownianMotion);
    let call = ContractSpec::european_call("gbm", 100.0, maturity(89)).unwrap();
    let put = ContractSpec::european_put("gbm", 100.0, maturity(89)).unwrap();

    let c = lewis().present_value(&gbm, &call).unwrap();
    let p = lewis().present_value(&gbm, &put).unwrap();
    assert_relative_eq!(c, 4.06, epsilon = 0.01);
    assert_relative_eq!(p, 3.81, epsilon = 0.01);

    let bs = BlackScholes::new(100.0, 0.01, 0.2).unwrap();
    assert_relative_eq!(c, bs.price_call(100.0, 89.0 / 365.0), epsilon = 1e-8);
}

#[test]
fn test_merton_matches_series() {
    let jumps = JumpParams::new(0.3, -0.75, 0.1);
    let merton = state("jd", ModelDynamics::JumpDiffusion(jumps));
    let series = MertonJumps {
        intensity: 0.3,
        mean: -0.75,
        volatility: 0.1,
    };
    let t = 365.0 / 365.0;
    for strike in [80.0, 100.0, 120.0] {
        let call = ContractSpec::european_call("jd", strike, maturity(365)).unwrap();
        let put = ContractSpec::european_put("jd", strike, maturity(365)).unwrap();
        let expected_call = merton_series_call(100.0, strike, 0.01, 0.2, t, series).unwrap();
        let expected_put = merton_series_put(100.0, strike, 0.01, 0.2, t, series).unwrap();
        assert_relative_eq!(lewis().present_value(&merton, &call).unwrap(), expected_call, epsilon = 1e-7);
        assert_relative_eq!(carr_madan().present_value(&merton, &put).unwrap(), expected_put, epsilon = 1e-7);
    }
}

// ============================================================================
// Model nesting
// ============================================================================

// ============================================================================
// States without diffusion
// ============================================================================

fn zero_volatility_state(name: &str, dynamics: ModelDynamics) -> MarketState {
    MarketState::builder(name)
        .pricing_date(pricing_date())
        .initial_value(100.0)
        .volatility(0.0)
        .short_rate(0.01)
        .dynamics(dynamics)
        .build()
        .unwrap()
}

#[test]
fn test_zero_volatility_gbm_is_discounted_intrinsic() {
    let gbm = zero_volatility_state("gbm", ModelDynamics::GeometricBrownianMotion);
    let call = ContractSpec::european_call("gbm", 95.0, maturity(89)).unwrap();
    let put = ContractSpec::european_put("gbm", 95.0, maturity(89)).unwrap();
    let intrinsic = 100.0 - 95.0 * (-0.01_f64 * 89.0 / 365.0).exp();

    for pricer in [lewis(), carr_madan()] {
        assert_relative_eq!(pricer.present_value(&gbm, &call).unwrap(), intrinsic, epsilon = 1e-10);
        assert_relative_eq!(pricer.present_value(&gbm, &put).unwrap(), 0.0, epsilon = 1e-10);
    }
    assert_relative_eq!(intrinsic, 5.2314, epsilon = 1e-4);
}

#[test]
fn test_pure_jump_merton_matches_series() {
    let jumps = JumpParams::new(0.5, -0.1, 0.1);
    let merton = zero_volatility_state("jd", ModelDynamics::JumpDiffusion(jumps));
    let call = ContractSpec::european_call("jd", 95.0, maturity(89)).unwrap();
    let put = ContractSpec::european_put("jd", 95.0, maturity(89)).unwrap();
    let t = 89.0 / 365.0;
    let series = MertonJumps {
        intensity: 0.5,
        mean: -0.1,
        volatility: 0.1,
    };

    let c = lewis().present_value(&merton, &call).unwrap();
    let p = carr_madan().present_value(&merton, &put).unwrap();
    assert_relative_eq!(c, merton_series_call(100.0, 95.0, 0.01, 0.0, t, series).unwrap(), epsilon = 1e-12);
    assert_relative_eq!(p, merton_series_put(100.0, 95.0, 0.01, 0.0, t, series).unwrap(), epsilon = 1e-12);
    assert_relative_eq!(c - p, 100.0 - 95.0 * (-0.01 * t).exp(), epsilon = 1e-8);
    assert!(p > 0.0);
}

#[test]
fn test_heston_without_variance_is_discounted_intrinsic() {
    let heston = zero_volatility_state(
        "sv",
        ModelDynamics::StochasticVolatility(VarianceParams::new(2.0, 0.0, 0.3, -0.5)),
    );
    let call = ContractSpec::european_call("sv", 95.0, maturity(89)).unwrap();
    let intrinsic = 100.0 - 95.0 * (-0.01_f64 * 89.0 / 365.0).exp();
    assert_relative_eq!(lewis().present_value(&heston, &call).unwrap(), intrinsic, epsilon = 1e-10);
}

#[test]
fn test_merton_without_jumps_is_black_scholes() {
    let merton = state(
        "jd",
        ModelDynamics::JumpDiffusion(JumpParams::new(0.0, -0.5, 0.3)),
    );
    let call = ContractSpec::european_call("jd", 95.0, maturity(180)).unwrap();
    let bs = BlackScholes::new(100.0, 0.01, 0.2).unwrap();
    assert_relative_eq!(
        lewis().present_value(&merton, &call).unwrap(),
        bs.price_call(95.0, 180.0 / 365.0),
        epsilon = 1e-8
    );
}

#[test]
fn test_bates_without_jumps_is_heston() {
    let variance = VarianceParams::new(2.5, 0.04, 0.35, -0.6);
    let heston = state("sv", ModelDynamics::StochasticVolatility(variance));
    let bates = state(
        "sv",
        ModelDynamics::StochasticVolatilityJumpDiffusion(variance, JumpParams::new(0.0, -0.2, 0.1)),
    );
    for strike in [90.0, 100.0, 110.0] {
        let call = ContractSpec::european_call("sv", strike, maturity(270)).unwrap();
        assert_relative_eq!(
            lewis().present_value(&heston, &call).unwrap(),
            lewis().present_value(&bates, &call).unwrap(),
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_lewis_and_carr_madan_agree_for_heston_and_bates() {
    let variance = VarianceParams::new(1.8, 0.05, 0.4, -0.7);
    let jumps = JumpParams::new(0.5, -0.1, 0.15);
    let states = [
        state("sv", ModelDynamics::StochasticVolatility(variance)),
        state("sv", ModelDynamics::StochasticVolatilityJumpDiffusion(variance, jumps)),
    ];
    for s in &states {
        for strike in [85.0, 100.0, 115.0] {
            let put = ContractSpec::european_put("sv", strike, maturity(365)).unwrap();
            let a = lewis().present_value(s, &put).unwrap();
            let b = carr_madan().present_value(s, &put).unwrap();
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }
}

// ============================================================================
// Error conditions
// ============================================================================

#[test]
fn test_rejects_american_and_multi_underlying() {
    let gbm = state("gbm", ModelDynamics::GeometricBrownianMotion);
    let american = ContractSpec::american_put("gbm", 100.0, maturity(90)).unwrap();
    assert!(matches!(
        lewis().present_value(&gbm, &american),
        Err(PricingError::InvalidContract(_))
    ));

    let rainbow = ContractSpec::new(
        ExerciseStyle::European,
        vec!["gbm".into(), "jd".into()],
        maturity(90),
        Payoff::MaxCall { strike: 100.0 },
    )
    .unwrap();
    assert!(matches!(
        lewis().present_value(&gbm, &rainbow),
        Err(PricingError::InvalidContract(_))
    ));
}

#[test]
fn test_rejects_mismatched_underlying_and_expired_contract() {
    let gbm = state("gbm", ModelDynamics::GeometricBrownianMotion);
    let other = ContractSpec::european_call("sv", 100.0, maturity(90)).unwrap();
    assert!(matches!(
        lewis().present_value(&gbm, &other),
        Err(PricingError::UnknownRiskFactor(_))
    ));

    let expired = ContractSpec::european_call("gbm", 100.0, pricing_date()).unwrap();
    assert!(matches!(
        lewis().present_value(&gbm, &expired),
        Err(PricingError::InvalidContract(_))
    ));
}

#[test]
fn test_tight_bound_diverges() {
    let near_deterministic = MarketState::builder("gbm")
        .pricing_date(pricing_date())
        .initial_value(100.0)
        .volatility(0.001)
        .build()
        .unwrap();
    let call = ContractSpec::european_call("gbm", 100.0, maturity(30)).unwrap();
    let pricer = FourierPricer::new(FourierConfig::default().with_max_bound(400.0)).unwrap();
    assert!(matches!(
        pricer.present_value(&near_deterministic, &call),
        Err(PricingError::IntegrationDivergence { bound, .. }) if bound == 400.0
    ));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_put_call_parity_heston(
        strike in 70.0..140.0f64,
        days in 30i64..730,
        rho in -0.9..0.0f64,
    ) {
        let variance = VarianceParams::new(2.0, 0.04, 0.3, rho);
        let s = state("sv", ModelDynamics::StochasticVolatility(variance));
        let call = ContractSpec::european_call("sv", strike, maturity(days)).unwrap();
        let put = ContractSpec::european_put("sv", strike, maturity(days)).unwrap();
        for pricer in [lewis(), carr_madan()] {
            let c = pricer.present_value(&s, &call).unwrap();
            let p = pricer.present_value(&s, &put).unwrap();
            let t = s.year_fraction(maturity(days));
            let forward_gap = 100.0 - strike * (-0.01 * t).exp();
            prop_assert!((c - p - forward_gap).abs() < 1e-6);
            prop_assert!(c >= 0.0 && p >= -1e-8);
        }
    }
}
