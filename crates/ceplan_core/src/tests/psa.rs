//! Tests for PSA object construction, ICER tables and the frontier
//!
//! These tests verify that:
//! - Matrices keep their samples-by-strategies shape through construction
//! - The frontier has strictly increasing effects and non-decreasing ICERs
//! - Strong and extended dominance are reported instead of ratios
//! - Provenance and auto-naming behave as documented

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::PsaError;
use crate::frontier::DominanceStatus;
use crate::model::{ParamDistribution, ParameterSpec, sample_parameters};
use crate::psa::{Psa, SampleMatrix};

/// Single-sample PSA with the given per-strategy costs and effects.
fn deterministic_psa(costs: &[f64], effects: &[f64], names: &[&str]) -> Psa {
    Psa::build(
        Some(SampleMatrix::from_rows(vec![costs.to_vec()]).unwrap()),
        SampleMatrix::from_rows(vec![effects.to_vec()]).unwrap(),
        None,
        Some(names.iter().map(|s| s.to_string()).collect()),
        "$",
        "QALY",
    )
    .unwrap()
}

#[test]
fn matrices_keep_their_shape() {
    let n = 40;
    let k = 3;
    let mut rng = SmallRng::seed_from_u64(9);
    let specs = vec![ParameterSpec::new(
        "p",
        ParamDistribution::Uniform { min: 0.0, max: 1.0 },
    )];
    let params = sample_parameters(&specs, n, &mut rng).unwrap();

    let cost_rows: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..k).map(|j| 100.0 * (i + j + 1) as f64).collect())
        .collect();
    let effect_rows: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..k).map(|j| (i * k + j) as f64 / 100.0).collect())
        .collect();

    let psa = Psa::build(
        Some(SampleMatrix::from_rows(cost_rows).unwrap()),
        SampleMatrix::from_rows(effect_rows).unwrap(),
        Some(params),
        None,
        "$",
        "QALY",
    )
    .unwrap();

    assert_eq!(psa.n_samples(), n);
    assert_eq!(psa.n_strategies(), k);
    assert_eq!(psa.cost().unwrap().n_samples(), n);
    assert_eq!(psa.cost().unwrap().n_strategies(), k);
    assert_eq!(psa.effect().n_samples(), n);
    assert_eq!(psa.strategies(), ["Strategy_1", "Strategy_2", "Strategy_3"]);
}

#[test]
fn parameter_table_row_count_must_match() {
    let mut rng = SmallRng::seed_from_u64(9);
    let specs = vec![ParameterSpec::new(
        "p",
        ParamDistribution::Uniform { min: 0.0, max: 1.0 },
    )];
    let params = sample_parameters(&specs, 5, &mut rng).unwrap();
    let effect = SampleMatrix::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
    assert!(matches!(
        Psa::build(None, effect, Some(params), None, "$", "QALY"),
        Err(PsaError::ParameterRowMismatch {
            rows: 5,
            samples: 2
        })
    ));
}

#[test]
fn frontier_is_ordered_with_monotone_icers() {
    let psa = deterministic_psa(
        &[500.0, 0.0, 90.0, 400.0, 120.0],
        &[4.0, 0.0, 1.0, 3.5, 0.5],
        &["E", "A", "B", "D", "C"],
    );
    let frontier = psa.frontier().unwrap();
    assert_eq!(frontier.first().map(String::as_str), Some("A"));

    let rows = psa.icers().unwrap();
    let frontier_rows: Vec<_> = rows
        .iter()
        .filter(|r| r.status == DominanceStatus::Frontier)
        .collect();
    for w in frontier_rows.windows(2) {
        assert!(w[1].effect > w[0].effect, "frontier effects must increase");
    }
    let icers: Vec<f64> = frontier_rows.iter().filter_map(|r| r.icer).collect();
    for w in icers.windows(2) {
        assert!(w[1] >= w[0], "frontier ICERs must be non-decreasing");
    }
}

#[test]
fn icer_table_reports_dominance_instead_of_ratios() {
    // D is strongly dominated (costs more, yields less than B); C is removed
    // by extended dominance (a worse incremental price than the later E).
    let psa = deterministic_psa(
        &[0.0, 100.0, 150.0, 200.0, 250.0],
        &[0.0, 1.0, 1.2, 0.8, 2.0],
        &["A", "B", "C", "D", "E"],
    );
    let rows = psa.icers().unwrap();
    let by_name = |name: &str| rows.iter().find(|r| r.strategy == name).unwrap();

    assert_eq!(by_name("A").status, DominanceStatus::Frontier);
    assert_eq!(by_name("A").icer, None, "reference has no ratio");
    assert_eq!(by_name("B").icer, Some(100.0));
    assert_eq!(by_name("C").status, DominanceStatus::ExtendedlyDominated);
    assert_eq!(by_name("C").icer, None);
    assert_eq!(by_name("D").status, DominanceStatus::Dominated);
    assert_eq!(by_name("D").icer, None);
    // After C drops, E is priced against B: (250-100)/(2-1).
    assert_eq!(by_name("E").icer, Some(150.0));

    assert_eq!(psa.frontier().unwrap(), ["A", "B", "E"]);
}

#[test]
fn icer_rows_are_ordered_by_ascending_effect() {
    let psa = deterministic_psa(
        &[250.0, 0.0, 100.0],
        &[2.0, 0.0, 1.0],
        &["high", "low", "mid"],
    );
    let rows = psa.icers().unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.strategy.as_str()).collect();
    assert_eq!(order, ["low", "mid", "high"]);
}

#[test]
fn equal_effect_ties_prefer_the_cheaper_strategy() {
    let psa = deterministic_psa(&[100.0, 80.0], &[1.0, 1.0], &["pricey", "cheap"]);
    let rows = psa.icers().unwrap();
    let by_name = |name: &str| rows.iter().find(|r| r.strategy == name).unwrap();
    assert_eq!(by_name("cheap").status, DominanceStatus::Frontier);
    assert_eq!(by_name("pricey").status, DominanceStatus::Dominated);
    assert_eq!(psa.frontier().unwrap(), ["cheap"]);
}

#[test]
fn incremental_outcomes_default_to_the_cheapest_reference() {
    let psa = deterministic_psa(&[100.0, 250.0, 400.0], &[1.0, 1.5, 1.5], &["A", "B", "C"]);
    let rows = psa.incremental(None).unwrap();

    // A is the cheapest strategy, so it is the reference.
    assert_eq!(rows[0].strategy, "A");
    assert_eq!(rows[0].inc_cost, 0.0);
    assert_eq!(rows[0].icer, None);
    assert_eq!(rows[1].inc_cost, 150.0);
    assert_eq!(rows[1].inc_effect, 0.5);
    assert_eq!(rows[1].icer, Some(300.0));
}

#[test]
fn incremental_outcomes_accept_a_designated_reference() {
    let psa = deterministic_psa(&[100.0, 250.0], &[1.0, 1.5], &["A", "B"]);
    let rows = psa.incremental(Some("B")).unwrap();
    assert_eq!(rows[0].inc_cost, -150.0);
    assert_eq!(rows[0].inc_effect, -0.5);
    assert_eq!(rows[0].icer, Some(300.0));
    assert_eq!(rows[1].icer, None, "reference has no ratio against itself");

    assert!(matches!(
        psa.incremental(Some("missing")),
        Err(PsaError::UnknownStrategy { .. })
    ));
}

#[test]
fn zero_incremental_effect_reports_no_ratio() {
    let psa = deterministic_psa(&[100.0, 250.0], &[1.0, 1.0], &["A", "B"]);
    let rows = psa.incremental(None).unwrap();
    assert_eq!(rows[1].inc_cost, 150.0);
    assert_eq!(rows[1].icer, None);
}

#[test]
fn cost_free_psa_refuses_cost_dependent_analysis() {
    let effect = SampleMatrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
    let psa = Psa::build(None, effect, None, None, "$", "QALY").unwrap();
    assert!(matches!(psa.icers(), Err(PsaError::MissingCosts)));
    assert!(matches!(psa.frontier(), Err(PsaError::MissingCosts)));
}
