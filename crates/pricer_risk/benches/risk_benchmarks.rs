//! Criterion benchmarks for portfolio revaluation and risk reports.
//!
//! Benchmarks cover:
//! - Portfolio revaluation with a growing number of positions on shared
//!   risk factors
//! - A Delta risk report over a relative grid

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::Date;
use pricer_models::instruments::ContractSpec;
use pricer_models::models::{JumpParams, MarketParameter, MarketState, ModelDynamics};
use pricer_pricing::mc::SimulationConfig;
use pricer_risk::portfolio::{Portfolio, Position};
use pricer_risk::scenarios::SweepGrid;

fn factor(name: &str, dynamics: ModelDynamics) -> Arc<MarketState> {
    Arc::new(
        MarketState::builder(name)
            .pricing_date(Date::from_ymd(2015, 1, 1).unwrap())
            .initial_value(36.0)
            .volatility(0.2)
            .short_rate(0.06)
            .dynamics(dynamics)
            .build()
            .unwrap(),
    )
}

/// Alternating calls and puts over a strike ladder on two factors.
fn portfolio(n_positions: usize) -> Portfolio {
    let gbm = factor("gbm", ModelDynamics::GeometricBrownianMotion);
    let jd = factor("jd", ModelDynamics::JumpDiffusion(JumpParams::new(0.75, -0.6, 0.25)));
    let maturity = Date::from_ymd(2015, 12, 31).unwrap();

    let positions = (0..n_positions).map(|i| {
        let strike = 30.0 + (i % 12) as f64;
        let (name, state) = if i % 2 == 0 { ("gbm", &gbm) } else { ("jd", &jd) };
        let contract = if i % 3 == 0 {
            ContractSpec::european_put(name, strike, maturity)
        } else {
            ContractSpec::european_call(name, strike, maturity)
        }
        .unwrap();
        (format!("pos_{:04}", i), Position::new(1.0, contract, vec![Arc::clone(state)]).unwrap())
    });

    Portfolio::builder()
        .add_positions(positions)
        .correlation("gbm", "jd", 0.5)
        .simulation(SimulationConfig::builder().n_paths(5_000).seed(42).build().unwrap())
        .build()
        .unwrap()
}

fn bench_total_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio_total_value");
    group.sample_size(10);

    for n in [2usize, 16, 64] {
        let p = portfolio(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            b.iter(|| black_box(p).total_value().unwrap())
        });
    }
    group.finish();
}

fn bench_risk_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_report");
    group.sample_size(10);
    let p = portfolio(16);
    let grid = SweepGrid::relative_range(0.8, 1.2, 5).unwrap();

    group.bench_function("delta_5_points", |b| {
        b.iter(|| {
            p.risk_report(black_box("gbm"), MarketParameter::InitialValue, &grid)
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_total_value, bench_risk_report);
criterion_main!(benches);
