//! Criterion benchmarks for ceplan_core
//!
//! Run with: cargo bench -p ceplan_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use ceplan_core::analysis::{ceac, evpi, expected_loss};
use ceplan_core::error::ModelError;
use ceplan_core::evaluate::run_psa;
use ceplan_core::model::{
    ParamDistribution, ParamSet, ParameterSpec, StrategyOutcomes, sample_parameters,
};
use ceplan_core::psa::Psa;

fn specs() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::new("p_response", ParamDistribution::BetaMoments { mean: 0.4, sd: 0.04 }),
        ParameterSpec::new(
            "c_treatment",
            ParamDistribution::GammaMoments {
                mean: 1200.0,
                sd: 200.0,
            },
        ),
        ParameterSpec::new(
            "u_response",
            ParamDistribution::TruncNormal {
                mean: 0.85,
                sd: 0.05,
                lower: Some(0.0),
                upper: Some(1.0),
            },
        ),
    ]
}

fn demo_model(params: &ParamSet) -> Result<Vec<StrategyOutcomes>, ModelError> {
    let p = params.get("p_response").ok_or("missing p_response")?;
    let c = params.get("c_treatment").ok_or("missing c_treatment")?;
    let u = params.get("u_response").ok_or("missing u_response")?;
    Ok(vec![
        StrategyOutcomes::new("usual_care")
            .outcome("cost", 400.0)
            .outcome("qaly", 0.7),
        StrategyOutcomes::new("treatment")
            .outcome("cost", 400.0 + c)
            .outcome("qaly", 0.7 + p * (u - 0.7)),
    ])
}

fn build_psa(n: usize) -> Psa {
    let mut rng = SmallRng::seed_from_u64(42);
    let samples = sample_parameters(&specs(), n, &mut rng).unwrap();
    run_psa(&demo_model, &ParamSet::new(), &samples, None)
        .unwrap()
        .into_psa(Some("cost"), "qaly", "$", "QALY")
        .unwrap()
}

fn bench_sampling(c: &mut Criterion) {
    let specs = specs();
    c.bench_function("sample_parameters_10k", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(42);
            sample_parameters(black_box(&specs), black_box(10_000), &mut rng).unwrap()
        })
    });
}

fn bench_psa_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_psa");
    for n in [1_000, 10_000].iter() {
        let mut rng = SmallRng::seed_from_u64(42);
        let samples = sample_parameters(&specs(), *n, &mut rng).unwrap();
        let base = ParamSet::new();
        group.bench_with_input(BenchmarkId::new("samples", n), n, |b, _| {
            b.iter(|| run_psa(black_box(&demo_model), black_box(&base), &samples, None).unwrap())
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let psa = build_psa(10_000);
    let wtps: Vec<f64> = (0..=20).map(|i| 5_000.0 * i as f64).collect();

    c.bench_function("ceac_10k_samples_21_thresholds", |b| {
        b.iter(|| ceac(black_box(&psa), black_box(&wtps)).unwrap())
    });
    c.bench_function("expected_loss_10k_samples", |b| {
        b.iter(|| expected_loss(black_box(&psa), black_box(&wtps)).unwrap())
    });
    c.bench_function("evpi_10k_samples", |b| {
        b.iter(|| evpi(black_box(&psa), black_box(&wtps)).unwrap())
    });
    c.bench_function("icers", |b| b.iter(|| black_box(&psa).icers().unwrap()));
}

criterion_group!(benches, bench_sampling, bench_psa_run, bench_metrics);
criterion_main!(benches);
