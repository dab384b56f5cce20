//! Decision-analytic metrics over a completed PSA: net monetary benefit,
//! expected loss, cost-effectiveness acceptability, and the expected value
//! of perfect information.
//!
//! All of these are pure functions of the PSA object and a
//! willingness-to-pay grid, recomputed on demand. Each fails with
//! [`PsaError::MissingCosts`] when the PSA carries no cost matrix.

use serde::{Deserialize, Serialize};

use crate::error::PsaError;
use crate::psa::{Psa, SampleMatrix};

/// Expected loss of one strategy at one willingness-to-pay threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedLossRow {
    pub wtp: f64,
    pub strategy: String,
    pub expected_loss: f64,
    /// True when this strategy attains the minimal expected loss at `wtp`,
    /// i.e. it is the frontier choice at that threshold.
    pub optimal: bool,
}

/// Proportion of samples in which one strategy is optimal at one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeacRow {
    pub wtp: f64,
    pub strategy: String,
    pub proportion: f64,
}

/// A contiguous WTP sub-range over which one strategy is the
/// most-frequently-optimal choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeacRange {
    pub strategy: String,
    pub wtp_from: f64,
    pub wtp_to: f64,
}

/// Expected value of perfect information at one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvpiRow {
    pub wtp: f64,
    pub evpi: f64,
}

/// Per-sample per-strategy net monetary benefit: `effect * wtp - cost`.
pub fn nmb(psa: &Psa, wtp: f64) -> Result<SampleMatrix, PsaError> {
    let cost = psa.require_cost()?;
    let effect = psa.effect();
    let mut out = SampleMatrix::zeros(effect.n_samples(), effect.n_strategies());
    for i in 0..effect.n_samples() {
        for j in 0..effect.n_strategies() {
            out.set(i, j, effect.get(i, j) * wtp - cost.get(i, j));
        }
    }
    Ok(out)
}

/// Expected loss per strategy per threshold: the mean shortfall of choosing
/// that strategy instead of the per-sample optimum.
///
/// The minimal expected loss at a threshold equals the EVPI there, and the
/// strategies attaining it are flagged `optimal`. Rows are ordered threshold
/// outermost, strategies in declared order.
pub fn expected_loss(psa: &Psa, wtps: &[f64]) -> Result<Vec<ExpectedLossRow>, PsaError> {
    let n = psa.n_samples() as f64;
    let mut rows = Vec::with_capacity(wtps.len() * psa.n_strategies());
    for &wtp in wtps {
        let benefits = nmb(psa, wtp)?;
        let mut shortfalls = vec![0.0; psa.n_strategies()];
        for i in 0..benefits.n_samples() {
            let (_, best) = benefits.row_argmax(i);
            for (j, shortfall) in shortfalls.iter_mut().enumerate() {
                *shortfall += best - benefits.get(i, j);
            }
        }
        shortfalls.iter_mut().for_each(|s| *s /= n);

        let min_loss = shortfalls.iter().copied().fold(f64::INFINITY, f64::min);
        for (j, strategy) in psa.strategies().iter().enumerate() {
            rows.push(ExpectedLossRow {
                wtp,
                strategy: strategy.clone(),
                expected_loss: shortfalls[j],
                optimal: shortfalls[j] == min_loss,
            });
        }
    }
    Ok(rows)
}

/// Cost-effectiveness acceptability curve: for each threshold, the
/// proportion of samples in which each strategy has the highest net monetary
/// benefit. Per-sample ties resolve to the earliest strategy in declared
/// order, so the proportions at a threshold always sum to one.
pub fn ceac(psa: &Psa, wtps: &[f64]) -> Result<Vec<CeacRow>, PsaError> {
    let n = psa.n_samples() as f64;
    let mut rows = Vec::with_capacity(wtps.len() * psa.n_strategies());
    for &wtp in wtps {
        let benefits = nmb(psa, wtp)?;
        let mut counts = vec![0usize; psa.n_strategies()];
        for i in 0..benefits.n_samples() {
            let (best, _) = benefits.row_argmax(i);
            counts[best] += 1;
        }
        for (j, strategy) in psa.strategies().iter().enumerate() {
            rows.push(CeacRow {
                wtp,
                strategy: strategy.clone(),
                proportion: counts[j] as f64 / n,
            });
        }
    }
    Ok(rows)
}

/// Summarize a CEAC into the contiguous WTP ranges over which each strategy
/// is the most-frequently-optimal choice.
///
/// `rows` must be grouped by threshold (as [`ceac`] produces them).
/// Strategies that never attain the highest proportion are absent from the
/// summary; a strategy that leads over two disjoint ranges yields two rows.
#[must_use]
pub fn ceac_summary(rows: &[CeacRow]) -> Vec<CeacRange> {
    // Leader per threshold, in threshold order; ties to the first listed.
    let mut leaders: Vec<(f64, &str)> = Vec::new();
    let mut idx = 0;
    while idx < rows.len() {
        let wtp = rows[idx].wtp;
        let mut leader = &rows[idx];
        while idx < rows.len() && rows[idx].wtp == wtp {
            if rows[idx].proportion > leader.proportion {
                leader = &rows[idx];
            }
            idx += 1;
        }
        leaders.push((wtp, leader.strategy.as_str()));
    }

    let mut ranges: Vec<CeacRange> = Vec::new();
    for (wtp, strategy) in leaders {
        match ranges.last_mut() {
            Some(last) if last.strategy == strategy && last.wtp_to <= wtp => {
                last.wtp_to = wtp;
            }
            _ => ranges.push(CeacRange {
                strategy: strategy.to_string(),
                wtp_from: wtp,
                wtp_to: wtp,
            }),
        }
    }
    ranges
}

/// Expected value of perfect information per threshold:
/// `mean(per-sample max NMB) - max(per-strategy mean NMB)`.
///
/// Non-negative for every threshold, and zero exactly when the same strategy
/// maximizes NMB in every sample.
pub fn evpi(psa: &Psa, wtps: &[f64]) -> Result<Vec<EvpiRow>, PsaError> {
    let n = psa.n_samples() as f64;
    let mut rows = Vec::with_capacity(wtps.len());
    for &wtp in wtps {
        let benefits = nmb(psa, wtp)?;
        let mut sum_of_max = 0.0;
        for i in 0..benefits.n_samples() {
            let (_, best) = benefits.row_argmax(i);
            sum_of_max += best;
        }
        let max_of_means = benefits
            .means()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        rows.push(EvpiRow {
            wtp,
            evpi: sum_of_max / n - max_of_means,
        });
    }
    Ok(rows)
}
