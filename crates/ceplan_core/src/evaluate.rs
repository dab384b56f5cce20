//! Model evaluation driver - runs the external decision model over sampled
//! or gridded parameter sets.
//!
//! Three modes share one contract shape:
//! 1. **PSA**: one model call per row of a [`ParameterSamples`] table
//! 2. **One-way DSA**: one call per equally spaced value of each range
//! 3. **Two-way DSA**: one call per point of a two-parameter grid
//!
//! The first model call of a run fixes the strategy set/order and the outcome
//! column set; any later call that deviates fails the whole run. A failing
//! model call likewise aborts the run - there is no skip-and-continue.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{EvaluationError, ModelError};
use crate::model::{
    Owsa, OwsaRow, ParamSet, ParameterRange, ParameterSamples, StrategyOutcomes, Twsa, TwsaRow,
};
use crate::psa::{Psa, SampleMatrix};

/// The external decision model: a pure mapping from a parameter set to one
/// outcome row per strategy.
///
/// Fixed extra arguments (tables, settings) are closure captures; everything
/// that varies must arrive through the [`ParamSet`]. The model is assumed
/// deterministic given its argument and cheap enough to call thousands of
/// times.
pub trait DecisionModel {
    fn evaluate(&self, params: &ParamSet) -> Result<Vec<StrategyOutcomes>, ModelError>;
}

impl<F> DecisionModel for F
where
    F: Fn(&ParamSet) -> Result<Vec<StrategyOutcomes>, ModelError>,
{
    fn evaluate(&self, params: &ParamSet) -> Result<Vec<StrategyOutcomes>, ModelError> {
        self(params)
    }
}

/// Progress tracking for long evaluation runs.
///
/// Purely a visibility side channel: it never affects outputs and offers no
/// cancellation. Counters are shared atomics so a UI thread can poll them.
#[derive(Debug, Clone)]
pub struct Progress {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl Progress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
        }
    }

    /// Create from existing atomics (for embedding in a caller's UI state).
    pub fn from_atomics(completed: Arc<AtomicUsize>, total: Arc<AtomicUsize>) -> Self {
        Self { completed, total }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Strategy and outcome schema locked in by the first model call of a run.
struct RunSchema {
    strategies: Vec<String>,
    outcomes: Vec<String>,
}

impl RunSchema {
    fn from_first(rows: &[StrategyOutcomes], sample: usize) -> Result<Self, EvaluationError> {
        if rows.is_empty() {
            return Err(EvaluationError::EmptyModelOutput { sample });
        }
        let outcomes = rows[0].outcome_names();
        // Every strategy row of one call must carry the same columns.
        for row in &rows[1..] {
            let found = row.outcome_names();
            if found != outcomes {
                return Err(EvaluationError::OutcomeMismatch {
                    sample,
                    expected: outcomes,
                    found,
                });
            }
        }
        Ok(Self {
            strategies: rows.iter().map(|r| r.strategy.clone()).collect(),
            outcomes,
        })
    }

    fn check(&self, rows: &[StrategyOutcomes], sample: usize) -> Result<(), EvaluationError> {
        let strategies: Vec<String> = rows.iter().map(|r| r.strategy.clone()).collect();
        if strategies != self.strategies {
            return Err(EvaluationError::StrategyMismatch {
                sample,
                expected: self.strategies.clone(),
                found: strategies,
            });
        }
        for row in rows {
            let found = row.outcome_names();
            if found != self.outcomes {
                return Err(EvaluationError::OutcomeMismatch {
                    sample,
                    expected: self.outcomes.clone(),
                    found,
                });
            }
        }
        Ok(())
    }

    /// Resolve the requested outcome list against the locked schema.
    fn resolve_outcomes(&self, requested: Option<&[&str]>) -> Result<Vec<String>, EvaluationError> {
        match requested {
            None => Ok(self.outcomes.clone()),
            Some(names) => {
                for name in names {
                    if !self.outcomes.iter().any(|o| o == name) {
                        return Err(EvaluationError::UnknownOutcome {
                            outcome: (*name).to_string(),
                        });
                    }
                }
                Ok(names.iter().map(|n| (*n).to_string()).collect())
            }
        }
    }
}

/// Assembled result of a probabilistic sensitivity analysis run: one
/// samples-by-strategies matrix per outcome column the model produced, plus
/// the parameter sample table for provenance.
#[derive(Debug, Clone)]
pub struct PsaEvaluation {
    strategies: Vec<String>,
    outcomes: Vec<String>,
    matrices: Vec<SampleMatrix>,
    parameters: ParameterSamples,
}

impl PsaEvaluation {
    #[must_use]
    pub fn strategies(&self) -> &[String] {
        &self.strategies
    }

    #[must_use]
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterSamples {
        &self.parameters
    }

    /// Sample matrix for one outcome column.
    #[must_use]
    pub fn matrix(&self, outcome: &str) -> Option<&SampleMatrix> {
        self.outcomes
            .iter()
            .position(|o| o == outcome)
            .map(|i| &self.matrices[i])
    }

    /// Bind outcome columns to the cost/effect roles and build a [`Psa`].
    ///
    /// `cost` may be `None` for models without a designated cost outcome;
    /// cost-dependent metrics on the resulting object will then fail fast.
    pub fn into_psa(
        self,
        cost: Option<&str>,
        effect: &str,
        currency: impl Into<String>,
        effect_unit: impl Into<String>,
    ) -> Result<Psa, EvaluationError> {
        let cost = match cost {
            Some(name) => Some(self.matrix(name).cloned().ok_or_else(|| {
                EvaluationError::UnknownOutcome {
                    outcome: name.to_string(),
                }
            })?),
            None => None,
        };
        let effect = self.matrix(effect).cloned().ok_or_else(|| {
            EvaluationError::UnknownOutcome {
                outcome: effect.to_string(),
            }
        })?;
        let psa = Psa::build(
            cost,
            effect,
            Some(self.parameters),
            Some(self.strategies),
            currency,
            effect_unit,
        )?;
        Ok(psa)
    }
}

/// Run the model once per row of the parameter sample table.
///
/// Each row is overlaid onto `base` (row values win for overlapping names)
/// before the call. Results are assembled into per-outcome sample matrices
/// with row index equal to the originating sample index.
pub fn run_psa<M: DecisionModel + ?Sized>(
    model: &M,
    base: &ParamSet,
    samples: &ParameterSamples,
    progress: Option<&Progress>,
) -> Result<PsaEvaluation, EvaluationError> {
    let n = samples.n_samples();
    if n == 0 {
        return Err(EvaluationError::EmptySampleTable);
    }
    if let Some(p) = progress {
        p.reset(n);
    }

    let mut schema: Option<RunSchema> = None;
    let mut matrices: Vec<SampleMatrix> = Vec::new();

    for sample in 0..n {
        let merged = samples.overlay_row(base, sample);
        let rows = model
            .evaluate(&merged)
            .map_err(|source| EvaluationError::Model { sample, source })?;

        match &schema {
            None => {
                let locked = RunSchema::from_first(&rows, sample)?;
                matrices = locked
                    .outcomes
                    .iter()
                    .map(|_| SampleMatrix::zeros(n, locked.strategies.len()))
                    .collect();
                schema = Some(locked);
            }
            Some(locked) => locked.check(&rows, sample)?,
        }

        for (k, row) in rows.iter().enumerate() {
            for (j, (_, value)) in row.outcomes.iter().enumerate() {
                matrices[j].set(sample, k, *value);
            }
        }

        if let Some(p) = progress {
            p.increment();
        }
    }

    // n >= 1, so the first iteration locked the schema.
    let schema = schema.unwrap();
    Ok(PsaEvaluation {
        strategies: schema.strategies,
        outcomes: schema.outcomes,
        matrices,
        parameters: samples.clone(),
    })
}

fn validate_ranges(ranges: &[ParameterRange]) -> Result<(), EvaluationError> {
    if ranges.is_empty() {
        return Err(EvaluationError::EmptyRangeTable);
    }
    for range in ranges {
        if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
            return Err(EvaluationError::InvalidRange {
                parameter: range.name.clone(),
                min: range.min,
                max: range.max,
            });
        }
    }
    Ok(())
}

/// One-way deterministic sensitivity analysis.
///
/// For each range, the model is evaluated at `nsamp` equally spaced values
/// spanning `[min, max]` inclusive while every other parameter stays at base
/// case. Returns one long table per requested outcome (`None` requests all
/// outcomes the model produces). Multiple ranges request several independent
/// one-way sweeps sharing one result table.
pub fn run_owsa<M: DecisionModel + ?Sized>(
    model: &M,
    base: &ParamSet,
    ranges: &[ParameterRange],
    nsamp: usize,
    outcomes: Option<&[&str]>,
    progress: Option<&Progress>,
) -> Result<Vec<Owsa>, EvaluationError> {
    validate_ranges(ranges)?;
    if let Some(p) = progress {
        p.reset(ranges.len() * nsamp.max(1));
    }

    let mut schema: Option<RunSchema> = None;
    // (range index, parameter value, model rows), in evaluation order.
    let mut evaluations: Vec<(usize, f64, Vec<StrategyOutcomes>)> = Vec::new();

    for (range_idx, range) in ranges.iter().enumerate() {
        for value in range.values(nsamp) {
            let eval_index = evaluations.len();
            let merged = base.with(range.name.clone(), value);
            let rows =
                model
                    .evaluate(&merged)
                    .map_err(|source| EvaluationError::Model {
                        sample: eval_index,
                        source,
                    })?;
            match &schema {
                None => {
                    let locked = RunSchema::from_first(&rows, eval_index)?;
                    // Fail on unknown requested outcomes before sweeping on.
                    locked.resolve_outcomes(outcomes)?;
                    schema = Some(locked);
                }
                Some(locked) => locked.check(&rows, eval_index)?,
            }
            evaluations.push((range_idx, value, rows));
            if let Some(p) = progress {
                p.increment();
            }
        }
    }

    let schema = schema.unwrap();
    let selected = schema.resolve_outcomes(outcomes)?;

    let mut tables = Vec::with_capacity(selected.len());
    for outcome in selected {
        let mut rows = Vec::with_capacity(evaluations.len() * schema.strategies.len());
        for (range_idx, value, model_rows) in &evaluations {
            for row in model_rows {
                rows.push(OwsaRow {
                    parameter: ranges[*range_idx].name.clone(),
                    value: *value,
                    strategy: row.strategy.clone(),
                    // Present in every row by the schema check above.
                    outcome: row.value(&outcome).unwrap(),
                });
            }
        }
        tables.push(Owsa { outcome, rows });
    }
    Ok(tables)
}

/// Two-way deterministic sensitivity analysis.
///
/// Requires exactly two ranges and evaluates the model over the full
/// `nsamp * nsamp` cross-product grid, first parameter outermost, with all
/// other parameters at base case.
pub fn run_twsa<M: DecisionModel + ?Sized>(
    model: &M,
    base: &ParamSet,
    ranges: &[ParameterRange],
    nsamp: usize,
    outcomes: Option<&[&str]>,
    progress: Option<&Progress>,
) -> Result<Vec<Twsa>, EvaluationError> {
    if ranges.len() != 2 {
        return Err(EvaluationError::RangeCount {
            expected: 2,
            found: ranges.len(),
        });
    }
    validate_ranges(ranges)?;

    let values1 = ranges[0].values(nsamp);
    let values2 = ranges[1].values(nsamp);
    if let Some(p) = progress {
        p.reset(values1.len() * values2.len());
    }

    let mut schema: Option<RunSchema> = None;
    let mut evaluations: Vec<(f64, f64, Vec<StrategyOutcomes>)> = Vec::new();

    for &v1 in &values1 {
        for &v2 in &values2 {
            let eval_index = evaluations.len();
            let merged = base
                .with(ranges[0].name.clone(), v1)
                .with(ranges[1].name.clone(), v2);
            let rows =
                model
                    .evaluate(&merged)
                    .map_err(|source| EvaluationError::Model {
                        sample: eval_index,
                        source,
                    })?;
            match &schema {
                None => {
                    let locked = RunSchema::from_first(&rows, eval_index)?;
                    locked.resolve_outcomes(outcomes)?;
                    schema = Some(locked);
                }
                Some(locked) => locked.check(&rows, eval_index)?,
            }
            evaluations.push((v1, v2, rows));
            if let Some(p) = progress {
                p.increment();
            }
        }
    }

    let schema = schema.unwrap();
    let selected = schema.resolve_outcomes(outcomes)?;

    let mut tables = Vec::with_capacity(selected.len());
    for outcome in selected {
        let mut rows = Vec::with_capacity(evaluations.len() * schema.strategies.len());
        for (v1, v2, model_rows) in &evaluations {
            for row in model_rows {
                rows.push(TwsaRow {
                    value1: *v1,
                    value2: *v2,
                    strategy: row.strategy.clone(),
                    outcome: row.value(&outcome).unwrap(),
                });
            }
        }
        tables.push(Twsa {
            parameter1: ranges[0].name.clone(),
            parameter2: ranges[1].name.clone(),
            outcome,
            rows,
        });
    }
    Ok(tables)
}
