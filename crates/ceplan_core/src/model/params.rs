use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A named set of parameter values, the single argument of the external
/// decision model.
///
/// Every value the model needs must be present here (or captured by the model
/// closure itself); there is no ambient parameter scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    values: FxHashMap<String, f64>,
}

impl ParamSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value, replacing any existing one.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of this set with `name` overridden to `value`.
    #[must_use]
    pub fn with(&self, name: impl Into<String>, value: f64) -> Self {
        let mut merged = self.clone();
        merged.set(name, value);
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// An immutable table of sampled parameter values: one column per varied
/// parameter, one row per sample.
///
/// Column order is the generation order, which downstream consumers rely on
/// for provenance and deterministic sensitivity analysis on PSA output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSamples {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ParameterSamples {
    /// Assemble a table from parallel name/column vectors.
    ///
    /// All columns must share a length; a mismatch is a caller bug.
    #[must_use]
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        assert_eq!(names.len(), columns.len(), "one name per column");
        if let Some(first) = columns.first() {
            assert!(
                columns.iter().all(|c| c.len() == first.len()),
                "columns must share the sample count"
            );
        }
        Self { names, columns }
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn n_parameters(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column of sampled values for `name`, if that parameter was varied.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Overlay row `sample` onto `base`; sampled values win over base-case
    /// values for overlapping names.
    #[must_use]
    pub fn overlay_row(&self, base: &ParamSet, sample: usize) -> ParamSet {
        let mut merged = base.clone();
        for (name, column) in self.names.iter().zip(&self.columns) {
            merged.set(name.clone(), column[sample]);
        }
        merged
    }
}
