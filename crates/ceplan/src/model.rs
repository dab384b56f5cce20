//! Built-in demonstration decision model: a three-state (healthy, sick,
//! dead) cohort model comparing usual care against two treatments that slow
//! disease progression at different prices.
//!
//! Every input arrives through the [`ParamSet`] - the model reads nothing
//! from ambient state - so any parameter can be varied probabilistically or
//! swept deterministically from the analysis configuration.

use ceplan_core::error::ModelError;
use ceplan_core::model::{ParamSet, StrategyOutcomes};

pub const OUTCOME_COST: &str = "cost";
pub const OUTCOME_QALY: &str = "qaly";

/// Default base-case parameter values.
#[must_use]
pub fn base_case() -> ParamSet {
    [
        // Cohort and discounting
        ("n_cycles", 30.0),
        ("dr", 0.03),
        // Annual transition probabilities
        ("p_progress", 0.15),
        ("p_die_sick", 0.10),
        ("p_die_background", 0.005),
        // Relative risk of progression under each treatment
        ("rr_a", 0.60),
        ("rr_b", 0.40),
        // Annual costs
        ("c_healthy", 500.0),
        ("c_sick", 3_000.0),
        ("c_a", 2_000.0),
        ("c_b", 5_000.0),
        // State utilities
        ("u_healthy", 0.95),
        ("u_sick", 0.70),
    ]
    .into_iter()
    .collect()
}

fn require(params: &ParamSet, name: &str) -> Result<f64, ModelError> {
    params
        .get(name)
        .ok_or_else(|| format!("missing parameter {name:?}").into())
}

/// Run the cohort trace for one strategy and return total discounted
/// (cost, qaly) per cohort member.
fn trace(
    params: &ParamSet,
    rr_progress: f64,
    annual_treatment_cost: f64,
) -> Result<(f64, f64), ModelError> {
    let n_cycles = require(params, "n_cycles")?.round().max(0.0) as usize;
    let dr = require(params, "dr")?;
    let p_progress = require(params, "p_progress")? * rr_progress;
    let p_die_sick = require(params, "p_die_sick")?;
    let p_die_background = require(params, "p_die_background")?;
    let c_healthy = require(params, "c_healthy")?;
    let c_sick = require(params, "c_sick")?;
    let u_healthy = require(params, "u_healthy")?;
    let u_sick = require(params, "u_sick")?;

    for (name, p) in [
        ("p_progress", p_progress),
        ("p_die_sick", p_die_sick),
        ("p_die_background", p_die_background),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(format!("{name} = {p} is not a probability").into());
        }
    }
    if p_progress + p_die_background > 1.0 {
        return Err("healthy-state exit probabilities exceed 1".into());
    }

    let mut healthy = 1.0_f64;
    let mut sick = 0.0_f64;
    let mut cost = 0.0;
    let mut qaly = 0.0;

    for cycle in 0..n_cycles {
        let discount = (1.0 + dr).powi(cycle as i32).recip();
        let alive = healthy + sick;
        cost += discount * (healthy * c_healthy + sick * c_sick + alive * annual_treatment_cost);
        qaly += discount * (healthy * u_healthy + sick * u_sick);

        let newly_sick = healthy * p_progress;
        healthy *= 1.0 - p_progress - p_die_background;
        sick = sick * (1.0 - p_die_sick) + newly_sick;
    }

    Ok((cost, qaly))
}

/// The demonstration decision model: one outcome row per strategy with
/// `cost` and `qaly` columns.
pub fn evaluate(params: &ParamSet) -> Result<Vec<StrategyOutcomes>, ModelError> {
    let rr_a = require(params, "rr_a")?;
    let rr_b = require(params, "rr_b")?;
    let c_a = require(params, "c_a")?;
    let c_b = require(params, "c_b")?;

    let (cost_uc, qaly_uc) = trace(params, 1.0, 0.0)?;
    let (cost_a, qaly_a) = trace(params, rr_a, c_a)?;
    let (cost_b, qaly_b) = trace(params, rr_b, c_b)?;

    Ok(vec![
        StrategyOutcomes::new("usual_care")
            .outcome(OUTCOME_COST, cost_uc)
            .outcome(OUTCOME_QALY, qaly_uc),
        StrategyOutcomes::new("treatment_a")
            .outcome(OUTCOME_COST, cost_a)
            .outcome(OUTCOME_QALY, qaly_a),
        StrategyOutcomes::new("treatment_b")
            .outcome(OUTCOME_COST, cost_b)
            .outcome(OUTCOME_QALY, qaly_b),
    ])
}
