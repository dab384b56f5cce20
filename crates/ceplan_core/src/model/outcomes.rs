use serde::{Deserialize, Serialize};

/// One strategy's row of a model evaluation: the strategy identifier plus the
/// named numeric outcomes, in the model's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcomes {
    pub strategy: String,
    pub outcomes: Vec<(String, f64)>,
}

impl StrategyOutcomes {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            outcomes: Vec::new(),
        }
    }

    /// Append a named outcome column, builder style.
    #[must_use]
    pub fn outcome(mut self, name: impl Into<String>, value: f64) -> Self {
        self.outcomes.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn outcome_names(&self) -> Vec<String> {
        self.outcomes.iter().map(|(n, _)| n.clone()).collect()
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

/// Deterministic sweep range for one parameter: name, minimum, maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// `nsamp` equally spaced values spanning `[min, max]` inclusive.
    ///
    /// `nsamp <= 1` degenerates to the minimum alone.
    #[must_use]
    pub fn values(&self, nsamp: usize) -> Vec<f64> {
        if nsamp <= 1 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (nsamp - 1) as f64;
        (0..nsamp).map(|i| self.min + step * i as f64).collect()
    }
}

/// One evaluation point of a one-way deterministic sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwsaRow {
    pub parameter: String,
    pub value: f64,
    pub strategy: String,
    pub outcome: f64,
}

/// Long-format result of a one-way deterministic sensitivity analysis for a
/// single outcome, across one or more swept parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owsa {
    pub outcome: String,
    pub rows: Vec<OwsaRow>,
}

/// One evaluation point of a two-way deterministic sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwsaRow {
    pub value1: f64,
    pub value2: f64,
    pub strategy: String,
    pub outcome: f64,
}

/// Long-format result of a two-way deterministic sensitivity analysis for a
/// single outcome over the full parameter grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Twsa {
    pub parameter1: String,
    pub parameter2: String,
    pub outcome: String,
    pub rows: Vec<TwsaRow>,
}
