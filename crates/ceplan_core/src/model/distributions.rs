use rand::{Rng, distr::Distribution as _};
use serde::{Deserialize, Serialize};

use crate::error::DistributionError;
use crate::model::ParameterSamples;

/// Attempts allowed when rejection-sampling a truncated normal before the
/// truncation interval is declared to carry negligible probability mass.
const TRUNCATION_ATTEMPT_LIMIT: usize = 10_000;

/// A parameter distribution, one variant per supported
/// (family, parameterization) pair.
///
/// Moment-style variants (`BetaMoments`, `GammaMoments`) are converted to the
/// family's native shape parameters on every draw via method-of-moments;
/// conversions that imply non-physical parameters fail with
/// [`DistributionError::InvalidMoments`]. Combinations not listed here are
/// simply not expressible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParamDistribution {
    Normal {
        mean: f64,
        sd: f64,
    },
    /// Normal truncated to `[lower, upper]`; a `None` bound leaves that tail
    /// unclipped.
    TruncNormal {
        mean: f64,
        sd: f64,
        #[serde(default)]
        lower: Option<f64>,
        #[serde(default)]
        upper: Option<f64>,
    },
    Beta {
        alpha: f64,
        beta: f64,
    },
    BetaMoments {
        mean: f64,
        sd: f64,
    },
    Gamma {
        shape: f64,
        scale: f64,
    },
    GammaMoments {
        mean: f64,
        sd: f64,
    },
    LogNormal {
        meanlog: f64,
        sdlog: f64,
    },
    Triangular {
        min: f64,
        mode: f64,
        max: f64,
    },
    Uniform {
        min: f64,
        max: f64,
    },
    /// Resampling with replacement from observed realizations.
    Empirical {
        values: Vec<f64>,
    },
}

/// Convert a (mean, sd) pair to beta shape parameters by method of moments.
///
/// `phi = mean*(1-mean)/sd^2 - 1`, `alpha = mean*phi`, `beta = (1-mean)*phi`.
/// Fails when the implied alpha or beta is non-positive, i.e. the variance is
/// too large for the requested mean.
pub fn beta_from_moments(mean: f64, sd: f64) -> Result<(f64, f64), DistributionError> {
    if !(0.0..=1.0).contains(&mean) || !mean.is_finite() {
        return Err(DistributionError::InvalidMoments {
            family: "beta",
            mean,
            sd,
            reason: "mean must lie in [0, 1]",
        });
    }
    if sd <= 0.0 || !sd.is_finite() {
        return Err(DistributionError::InvalidMoments {
            family: "beta",
            mean,
            sd,
            reason: "sd must be positive and finite",
        });
    }
    let phi = mean * (1.0 - mean) / (sd * sd) - 1.0;
    let alpha = mean * phi;
    let beta = (1.0 - mean) * phi;
    if alpha <= 0.0 || beta <= 0.0 || !alpha.is_finite() || !beta.is_finite() {
        return Err(DistributionError::InvalidMoments {
            family: "beta",
            mean,
            sd,
            reason: "variance too large for the given mean (implied shape non-positive)",
        });
    }
    Ok((alpha, beta))
}

/// Convert a (mean, sd) pair to gamma (shape, scale) by method of moments.
///
/// `shape = mean^2/sd^2`, `scale = sd^2/mean`.
pub fn gamma_from_moments(mean: f64, sd: f64) -> Result<(f64, f64), DistributionError> {
    if mean <= 0.0 || !mean.is_finite() {
        return Err(DistributionError::InvalidMoments {
            family: "gamma",
            mean,
            sd,
            reason: "mean must be positive and finite",
        });
    }
    if sd <= 0.0 || !sd.is_finite() {
        return Err(DistributionError::InvalidMoments {
            family: "gamma",
            mean,
            sd,
            reason: "sd must be positive and finite",
        });
    }
    Ok((mean * mean / (sd * sd), sd * sd / mean))
}

impl ParamDistribution {
    /// Family label used in error context and display.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            ParamDistribution::Normal { .. } => "normal",
            ParamDistribution::TruncNormal { .. } => "truncated normal",
            ParamDistribution::Beta { .. } | ParamDistribution::BetaMoments { .. } => "beta",
            ParamDistribution::Gamma { .. } | ParamDistribution::GammaMoments { .. } => "gamma",
            ParamDistribution::LogNormal { .. } => "log-normal",
            ParamDistribution::Triangular { .. } => "triangular",
            ParamDistribution::Uniform { .. } => "uniform",
            ParamDistribution::Empirical { .. } => "empirical",
        }
    }

    /// Draw a single realization.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DistributionError> {
        match self {
            ParamDistribution::Normal { mean, sd } => rand_distr::Normal::new(*mean, *sd)
                .map(|d| d.sample(rng))
                .map_err(|_| DistributionError::InvalidParameters {
                    family: "normal",
                    reason: "sd must be non-negative and finite",
                }),
            ParamDistribution::TruncNormal {
                mean,
                sd,
                lower,
                upper,
            } => sample_truncated_normal(rng, *mean, *sd, *lower, *upper),
            ParamDistribution::Beta { alpha, beta } => rand_distr::Beta::new(*alpha, *beta)
                .map(|d| d.sample(rng))
                .map_err(|_| DistributionError::InvalidParameters {
                    family: "beta",
                    reason: "alpha and beta must be positive and finite",
                }),
            ParamDistribution::BetaMoments { mean, sd } => {
                let (alpha, beta) = beta_from_moments(*mean, *sd)?;
                rand_distr::Beta::new(alpha, beta)
                    .map(|d| d.sample(rng))
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "beta",
                        reason: "alpha and beta must be positive and finite",
                    })
            }
            ParamDistribution::Gamma { shape, scale } => rand_distr::Gamma::new(*shape, *scale)
                .map(|d| d.sample(rng))
                .map_err(|_| DistributionError::InvalidParameters {
                    family: "gamma",
                    reason: "shape and scale must be positive and finite",
                }),
            ParamDistribution::GammaMoments { mean, sd } => {
                let (shape, scale) = gamma_from_moments(*mean, *sd)?;
                rand_distr::Gamma::new(shape, scale)
                    .map(|d| d.sample(rng))
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "gamma",
                        reason: "shape and scale must be positive and finite",
                    })
            }
            ParamDistribution::LogNormal { meanlog, sdlog } => {
                rand_distr::LogNormal::new(*meanlog, *sdlog)
                    .map(|d| d.sample(rng))
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "log-normal",
                        reason: "sdlog must be non-negative and finite",
                    })
            }
            ParamDistribution::Triangular { min, mode, max } => {
                rand_distr::Triangular::new(*min, *max, *mode)
                    .map(|d| d.sample(rng))
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "triangular",
                        reason: "requires min <= mode <= max with min < max",
                    })
            }
            ParamDistribution::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite()) || min > max {
                    return Err(DistributionError::InvalidParameters {
                        family: "uniform",
                        reason: "requires finite min <= max",
                    });
                }
                Ok(rng.random_range(*min..=*max))
            }
            ParamDistribution::Empirical { values } => {
                if values.is_empty() {
                    return Err(DistributionError::EmptyEmpirical);
                }
                let idx = rng.random_range(0..values.len());
                Ok(values[idx])
            }
        }
    }

    /// Draw `n` independent realizations.
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<f64>, DistributionError> {
        let mut draws = Vec::with_capacity(n);
        for _ in 0..n {
            draws.push(self.sample(rng)?);
        }
        Ok(draws)
    }
}

fn sample_truncated_normal<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    sd: f64,
    lower: Option<f64>,
    upper: Option<f64>,
) -> Result<f64, DistributionError> {
    if let (Some(l), Some(u)) = (lower, upper)
        && l >= u
    {
        return Err(DistributionError::InvalidParameters {
            family: "truncated normal",
            reason: "lower bound must be below upper bound",
        });
    }
    let dist = rand_distr::Normal::new(mean, sd).map_err(|_| {
        DistributionError::InvalidParameters {
            family: "truncated normal",
            reason: "sd must be non-negative and finite",
        }
    })?;
    for _ in 0..TRUNCATION_ATTEMPT_LIMIT {
        let x = dist.sample(rng);
        if lower.is_none_or(|l| x >= l) && upper.is_none_or(|u| x <= u) {
            return Ok(x);
        }
    }
    Err(DistributionError::InvalidParameters {
        family: "truncated normal",
        reason: "truncation interval carries negligible probability mass",
    })
}

/// Distribution assignment for one varied parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub distribution: ParamDistribution,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, distribution: ParamDistribution) -> Self {
        Self {
            name: name.into(),
            distribution,
        }
    }
}

/// Build a parameter sample table by drawing `n` realizations per spec.
///
/// Columns are assembled in spec order under each parameter's declared name.
/// Sampling is independent across parameters; reproducibility follows from
/// the caller's RNG seeding and the preserved per-parameter draw order. On
/// any error no partial table is produced.
pub fn sample_parameters<R: Rng + ?Sized>(
    specs: &[ParameterSpec],
    n: usize,
    rng: &mut R,
) -> Result<ParameterSamples, DistributionError> {
    let mut names = Vec::with_capacity(specs.len());
    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        names.push(spec.name.clone());
        columns.push(spec.distribution.sample_n(rng, n)?);
    }
    Ok(ParameterSamples::from_columns(names, columns))
}
