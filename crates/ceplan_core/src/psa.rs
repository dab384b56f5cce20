//! The PSA object: assembled cost/effect sample matrices with strategy
//! labels and parameter provenance, plus the incremental cost-effectiveness
//! analysis derived from their per-strategy means.
//!
//! The object is read-only after construction; every derived quantity is
//! recomputed on demand from the matrices, never cached.

use serde::{Deserialize, Serialize};

use crate::error::PsaError;
use crate::frontier::{CePoint, DominanceStatus, classify, frontier_indices};
use crate::model::ParameterSamples;

/// A samples-by-strategies matrix stored flat in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMatrix {
    n_samples: usize,
    n_strategies: usize,
    data: Vec<f64>,
}

impl SampleMatrix {
    /// Zero-filled matrix of the given shape.
    #[must_use]
    pub fn zeros(n_samples: usize, n_strategies: usize) -> Self {
        Self {
            n_samples,
            n_strategies,
            data: vec![0.0; n_samples * n_strategies],
        }
    }

    /// Build from sample rows. Returns `None` when rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let n_samples = rows.len();
        let n_strategies = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_strategies) {
            return None;
        }
        Some(Self {
            n_samples,
            n_strategies,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Build from per-strategy columns. Returns `None` when columns are
    /// ragged.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Option<Self> {
        let n_strategies = columns.len();
        let n_samples = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != n_samples) {
            return None;
        }
        let mut data = vec![0.0; n_samples * n_strategies];
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in column.iter().enumerate() {
                data[i * n_strategies + j] = *value;
            }
        }
        Some(Self {
            n_samples,
            n_strategies,
            data,
        })
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[must_use]
    pub fn n_strategies(&self) -> usize {
        self.n_strategies
    }

    #[must_use]
    pub fn get(&self, sample: usize, strategy: usize) -> f64 {
        self.data[sample * self.n_strategies + strategy]
    }

    pub fn set(&mut self, sample: usize, strategy: usize, value: f64) {
        self.data[sample * self.n_strategies + strategy] = value;
    }

    /// One sample's values across all strategies.
    #[must_use]
    pub fn row(&self, sample: usize) -> &[f64] {
        let start = sample * self.n_strategies;
        &self.data[start..start + self.n_strategies]
    }

    /// Per-strategy mean across samples.
    #[must_use]
    pub fn means(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_strategies];
        for sample in 0..self.n_samples {
            for (sum, value) in sums.iter_mut().zip(self.row(sample)) {
                *sum += value;
            }
        }
        let n = self.n_samples as f64;
        sums.iter_mut().for_each(|s| *s /= n);
        sums
    }

    /// Index and value of the row maximum; earlier strategies win ties.
    #[must_use]
    pub fn row_argmax(&self, sample: usize) -> (usize, f64) {
        let row = self.row(sample);
        let mut best = 0;
        for (j, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = j;
            }
        }
        (best, row[best])
    }
}

/// Per-strategy mean outcomes across all samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub mean_cost: Option<f64>,
    pub mean_effect: f64,
}

/// Incremental outcomes of one strategy against a fixed reference strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalRow {
    pub strategy: String,
    pub inc_cost: f64,
    pub inc_effect: f64,
    /// Absent when the incremental effect is zero (a ratio would be
    /// meaningless) or the strategy is the reference itself.
    pub icer: Option<f64>,
}

/// One strategy's row of the incremental cost-effectiveness table.
///
/// Incremental columns are relative to the frontier predecessor and are
/// absent for the reference strategy and for dominated strategies, which
/// report their dominance status instead of a ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcerRow {
    pub strategy: String,
    pub cost: f64,
    pub effect: f64,
    pub inc_cost: Option<f64>,
    pub inc_effect: Option<f64>,
    pub icer: Option<f64>,
    pub status: DominanceStatus,
}

/// Completed probabilistic sensitivity analysis: cost and effect matrices
/// (samples by strategies), the parameter sample table they came from, and
/// display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psa {
    strategies: Vec<String>,
    cost: Option<SampleMatrix>,
    effect: SampleMatrix,
    parameters: ParameterSamples,
    currency: String,
    effect_unit: String,
}

impl Psa {
    /// Validate shapes and assemble a PSA object.
    ///
    /// When `strategies` is omitted, `Strategy_1..Strategy_k` are synthesized
    /// in column order. Cost is optional; effect is not. A non-empty
    /// parameter table must match the matrices' sample count.
    pub fn build(
        cost: Option<SampleMatrix>,
        effect: SampleMatrix,
        parameters: Option<ParameterSamples>,
        strategies: Option<Vec<String>>,
        currency: impl Into<String>,
        effect_unit: impl Into<String>,
    ) -> Result<Self, PsaError> {
        if effect.n_strategies() == 0 {
            return Err(PsaError::NoStrategies);
        }
        if effect.n_samples() == 0 {
            return Err(PsaError::NoSamples);
        }
        if let Some(cost) = &cost {
            if cost.n_samples() != effect.n_samples() {
                return Err(PsaError::SampleCountMismatch {
                    cost: cost.n_samples(),
                    effect: effect.n_samples(),
                });
            }
            if cost.n_strategies() != effect.n_strategies() {
                return Err(PsaError::StrategyCountMismatch {
                    cost: cost.n_strategies(),
                    effect: effect.n_strategies(),
                });
            }
        }
        let strategies = match strategies {
            Some(names) => {
                if names.len() != effect.n_strategies() {
                    return Err(PsaError::StrategyNameCount {
                        names: names.len(),
                        strategies: effect.n_strategies(),
                    });
                }
                names
            }
            None => (1..=effect.n_strategies())
                .map(|i| format!("Strategy_{i}"))
                .collect(),
        };
        let parameters = parameters.unwrap_or_default();
        if !parameters.is_empty() && parameters.n_samples() != effect.n_samples() {
            return Err(PsaError::ParameterRowMismatch {
                rows: parameters.n_samples(),
                samples: effect.n_samples(),
            });
        }
        Ok(Self {
            strategies,
            cost,
            effect,
            parameters,
            currency: currency.into(),
            effect_unit: effect_unit.into(),
        })
    }

    #[must_use]
    pub fn strategies(&self) -> &[String] {
        &self.strategies
    }

    #[must_use]
    pub fn n_strategies(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.effect.n_samples()
    }

    #[must_use]
    pub fn cost(&self) -> Option<&SampleMatrix> {
        self.cost.as_ref()
    }

    #[must_use]
    pub fn effect(&self) -> &SampleMatrix {
        &self.effect
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterSamples {
        &self.parameters
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn effect_unit(&self) -> &str {
        &self.effect_unit
    }

    /// Cost matrix or [`PsaError::MissingCosts`].
    pub fn require_cost(&self) -> Result<&SampleMatrix, PsaError> {
        self.cost.as_ref().ok_or(PsaError::MissingCosts)
    }

    /// Per-strategy mean cost and effect.
    #[must_use]
    pub fn summary(&self) -> Vec<StrategySummary> {
        let mean_costs = self.cost.as_ref().map(SampleMatrix::means);
        let mean_effects = self.effect.means();
        self.strategies
            .iter()
            .enumerate()
            .map(|(j, strategy)| StrategySummary {
                strategy: strategy.clone(),
                mean_cost: mean_costs.as_ref().map(|c| c[j]),
                mean_effect: mean_effects[j],
            })
            .collect()
    }

    fn mean_points(&self) -> Result<Vec<CePoint>, PsaError> {
        let costs = self.require_cost()?.means();
        let effects = self.effect.means();
        Ok(costs
            .into_iter()
            .zip(effects)
            .map(|(cost, effect)| CePoint { cost, effect })
            .collect())
    }

    /// Incremental cost, effect and ICER of every strategy against a single
    /// reference strategy.
    ///
    /// `reference` defaults to the lowest-mean-cost strategy. The reference's
    /// own row carries zero increments and no ratio, as does any strategy
    /// whose incremental effect is exactly zero.
    pub fn incremental(&self, reference: Option<&str>) -> Result<Vec<IncrementalRow>, PsaError> {
        let costs = self.require_cost()?.means();
        let effects = self.effect.means();

        let reference = match reference {
            Some(name) => self
                .strategies
                .iter()
                .position(|s| s == name)
                .ok_or_else(|| PsaError::UnknownStrategy {
                    name: name.to_string(),
                })?,
            None => costs
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(i, _)| i)
                .unwrap_or(0),
        };

        Ok(self
            .strategies
            .iter()
            .enumerate()
            .map(|(j, strategy)| {
                let inc_cost = costs[j] - costs[reference];
                let inc_effect = effects[j] - effects[reference];
                IncrementalRow {
                    strategy: strategy.clone(),
                    inc_cost,
                    inc_effect,
                    icer: (j != reference && inc_effect != 0.0).then(|| inc_cost / inc_effect),
                }
            })
            .collect())
    }

    /// Names of the frontier strategies in ascending-effect order.
    pub fn frontier(&self) -> Result<Vec<String>, PsaError> {
        let points = self.mean_points()?;
        Ok(frontier_indices(&points)
            .into_iter()
            .map(|i| self.strategies[i].clone())
            .collect())
    }

    /// Incremental cost-effectiveness table over per-strategy means.
    ///
    /// Rows are ordered by ascending mean effect (ties by lower cost).
    /// Frontier strategies carry incremental cost, incremental effect and
    /// ICER versus their frontier predecessor; the reference (first frontier
    /// strategy) and dominated strategies carry none.
    pub fn icers(&self) -> Result<Vec<IcerRow>, PsaError> {
        let points = self.mean_points()?;
        let statuses = classify(&points);
        let frontier = frontier_indices(&points);

        // Traversal order: ascending effect, ties broken by lower cost.
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            points[a]
                .effect
                .total_cmp(&points[b].effect)
                .then(points[a].cost.total_cmp(&points[b].cost))
        });

        let mut rows = Vec::with_capacity(points.len());
        for idx in order {
            let point = &points[idx];
            let mut row = IcerRow {
                strategy: self.strategies[idx].clone(),
                cost: point.cost,
                effect: point.effect,
                inc_cost: None,
                inc_effect: None,
                icer: None,
                status: statuses[idx],
            };
            if statuses[idx] == DominanceStatus::Frontier {
                let pos = frontier
                    .iter()
                    .position(|&i| i == idx)
                    .expect("frontier strategies appear in frontier order");
                if pos > 0 {
                    let prev = &points[frontier[pos - 1]];
                    let inc_cost = point.cost - prev.cost;
                    let inc_effect = point.effect - prev.effect;
                    row.inc_cost = Some(inc_cost);
                    row.inc_effect = Some(inc_effect);
                    row.icer = Some(inc_cost / inc_effect);
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
