//! Analysis configuration file format.
//!
//! A single JSON document describes one analysis: display labels, base-case
//! overrides for the demonstration model, the distributions of the varied
//! parameters, the deterministic range table, and the willingness-to-pay
//! grid.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

use ceplan_core::model::{ParamSet, ParameterRange, ParameterSpec};

/// Willingness-to-pay grid: `min`, `min + step`, ... up to `max` inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WtpGrid {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl WtpGrid {
    /// Expand the grid into explicit thresholds.
    #[must_use]
    pub fn thresholds(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.max < self.min {
            return vec![self.min];
        }
        let mut values = Vec::new();
        let mut wtp = self.min;
        while wtp <= self.max + 1e-9 {
            values.push(wtp);
            wtp += self.step;
        }
        values
    }
}

impl Default for WtpGrid {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 150_000.0,
            step: 5_000.0,
        }
    }
}

/// Top-level analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_effect_unit")]
    pub effect_unit: String,
    /// Base-case parameter values overriding the model defaults.
    #[serde(default)]
    pub base_case: BTreeMap<String, f64>,
    /// Distribution assignments for the probabilistically varied parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Range table for deterministic sweeps.
    #[serde(default)]
    pub ranges: Vec<ParameterRange>,
    #[serde(default)]
    pub wtp: WtpGrid,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_effect_unit() -> String {
    "QALY".to_string()
}

impl AnalysisConfig {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .wrap_err_with(|| format!("parsing config file {}", path.display()))
    }

    /// Overlay the configured base case onto the given defaults.
    #[must_use]
    pub fn base_params(&self, defaults: &ParamSet) -> ParamSet {
        let mut merged = defaults.clone();
        for (name, value) in &self.base_case {
            merged.set(name.clone(), *value);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wtp_grid_includes_both_endpoints() {
        let grid = WtpGrid {
            min: 0.0,
            max: 100.0,
            step: 25.0,
        };
        assert_eq!(grid.thresholds(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn degenerate_wtp_grid_yields_the_minimum() {
        let grid = WtpGrid {
            min: 50.0,
            max: 50.0,
            step: 0.0,
        };
        assert_eq!(grid.thresholds(), vec![50.0]);
    }

    #[test]
    fn config_parses_with_tagged_distributions() {
        let text = r#"{
            "currency": "EUR",
            "base_case": { "n_cycles": 20 },
            "parameters": [
                { "name": "p_progress", "distribution": { "type": "BetaMoments", "mean": 0.15, "sd": 0.02 } },
                { "name": "c_sick", "distribution": { "type": "GammaMoments", "mean": 3000.0, "sd": 500.0 } }
            ],
            "ranges": [
                { "name": "p_progress", "min": 0.05, "max": 0.3 }
            ],
            "wtp": { "min": 0.0, "max": 50000.0, "step": 10000.0 }
        }"#;
        let config: AnalysisConfig = serde_json::from_str(text).unwrap();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.effect_unit, "QALY");
        assert_eq!(config.parameters.len(), 2);
        assert_eq!(config.ranges.len(), 1);
        assert_eq!(config.wtp.thresholds().len(), 6);
    }
}
