//! Cost-effectiveness frontier construction.
//!
//! Pure functions over an immutable sequence of per-strategy mean
//! (cost, effect) points. The frontier is the subset of strategies that
//! survives strong dominance (another strategy at least as effective and no
//! more costly) and extended dominance (a combination further along the
//! effect ordering buys effect at a better incremental price), ordered by
//! ascending effect with a monotonically non-decreasing ICER sequence.

use serde::{Deserialize, Serialize};

/// A strategy's mean cost and mean effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CePoint {
    pub cost: f64,
    pub effect: f64,
}

/// Dominance classification of a strategy relative to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominanceStatus {
    /// On the cost-effectiveness frontier.
    Frontier,
    /// Strongly dominated: some strategy is at least as effective at no
    /// higher cost.
    Dominated,
    /// Eliminated by extended dominance: its ICER versus its effect-ordered
    /// predecessor exceeds that of a more effective successor.
    ExtendedlyDominated,
}

impl DominanceStatus {
    /// Conventional short code used in ICER tables.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DominanceStatus::Frontier => "ND",
            DominanceStatus::Dominated => "D",
            DominanceStatus::ExtendedlyDominated => "ED",
        }
    }
}

/// Classify every point. Exact (cost, effect) ties keep the earliest point
/// and mark the rest dominated, so the surviving effects are strictly
/// increasing.
#[must_use]
pub fn classify(points: &[CePoint]) -> Vec<DominanceStatus> {
    let mut statuses = vec![DominanceStatus::Frontier; points.len()];

    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            let strictly_better = (b.effect > a.effect && b.cost <= a.cost)
                || (b.effect >= a.effect && b.cost < a.cost);
            let earlier_twin = b.effect == a.effect && b.cost == a.cost && j < i;
            if strictly_better || earlier_twin {
                statuses[i] = DominanceStatus::Dominated;
                break;
            }
        }
    }

    // Candidates in ascending-effect order; effects are strictly increasing
    // after the strong-dominance pass.
    let mut seq: Vec<usize> = (0..points.len())
        .filter(|&i| statuses[i] == DominanceStatus::Frontier)
        .collect();
    seq.sort_by(|&a, &b| points[a].effect.total_cmp(&points[b].effect));

    // Extended dominance: drop interior points until the ICER sequence is
    // monotonically non-decreasing.
    loop {
        let icers: Vec<f64> = seq
            .windows(2)
            .map(|w| {
                let (prev, next) = (&points[w[0]], &points[w[1]]);
                (next.cost - prev.cost) / (next.effect - prev.effect)
            })
            .collect();
        let Some(pos) = (0..icers.len().saturating_sub(1)).find(|&i| icers[i] > icers[i + 1])
        else {
            break;
        };
        // icers[pos] is the ratio into seq[pos + 1].
        statuses[seq[pos + 1]] = DominanceStatus::ExtendedlyDominated;
        seq.remove(pos + 1);
    }

    statuses
}

/// Indices of the frontier strategies in ascending-effect order.
#[must_use]
pub fn frontier_indices(points: &[CePoint]) -> Vec<usize> {
    let statuses = classify(points);
    let mut frontier: Vec<usize> = (0..points.len())
        .filter(|&i| statuses[i] == DominanceStatus::Frontier)
        .collect();
    frontier.sort_by(|&a, &b| points[a].effect.total_cmp(&points[b].effect));
    frontier
}
