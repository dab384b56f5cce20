use std::fmt;

/// Errors raised while drawing from a parameter distribution.
#[derive(Debug, Clone)]
pub enum DistributionError {
    /// Native distribution parameters were rejected (negative spread,
    /// inverted bounds, mode outside [min, max], ...).
    InvalidParameters {
        family: &'static str,
        reason: &'static str,
    },
    /// Moment-style inputs imply non-physical native parameters, e.g. a
    /// beta variance too large for the requested mean.
    InvalidMoments {
        family: &'static str,
        mean: f64,
        sd: f64,
        reason: &'static str,
    },
    /// An empirical distribution has no realizations to resample.
    EmptyEmpirical,
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::InvalidParameters { family, reason } => {
                write!(f, "invalid {family} parameters: {reason}")
            }
            DistributionError::InvalidMoments {
                family,
                mean,
                sd,
                reason,
            } => {
                write!(
                    f,
                    "invalid {family} moments (mean={mean}, sd={sd}): {reason}"
                )
            }
            DistributionError::EmptyEmpirical => {
                write!(f, "empirical distribution has no realizations")
            }
        }
    }
}

impl std::error::Error for DistributionError {}

/// Error type the external decision model may return from an evaluation.
pub type ModelError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the model evaluation driver.
///
/// Every variant is fatal to the enclosing run: no partial result table is
/// ever returned.
#[derive(Debug)]
pub enum EvaluationError {
    /// The model returned a strategy set or order different from its first
    /// evaluation in this run.
    StrategyMismatch {
        sample: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// The model returned an outcome column set different from its first
    /// evaluation in this run.
    OutcomeMismatch {
        sample: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// A requested outcome column is not produced by the model.
    UnknownOutcome { outcome: String },
    /// A sweep was requested with the wrong number of parameter ranges.
    RangeCount { expected: usize, found: usize },
    /// A parameter range has non-finite or inverted bounds.
    InvalidRange {
        parameter: String,
        min: f64,
        max: f64,
    },
    /// The range table contains no parameters.
    EmptyRangeTable,
    /// The parameter sample table contains no rows.
    EmptySampleTable,
    /// The model returned no strategy rows.
    EmptyModelOutput { sample: usize },
    /// The external model function itself failed.
    Model { sample: usize, source: ModelError },
    /// Parameter sampling failed before any model call was made.
    Distribution(DistributionError),
    /// Assembling the evaluated matrices into a PSA object failed.
    Psa(PsaError),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::StrategyMismatch {
                sample,
                expected,
                found,
            } => {
                write!(
                    f,
                    "strategy set changed at sample {sample}: expected {expected:?}, found {found:?}"
                )
            }
            EvaluationError::OutcomeMismatch {
                sample,
                expected,
                found,
            } => {
                write!(
                    f,
                    "outcome columns changed at sample {sample}: expected {expected:?}, found {found:?}"
                )
            }
            EvaluationError::UnknownOutcome { outcome } => {
                write!(f, "model does not produce an outcome named {outcome:?}")
            }
            EvaluationError::RangeCount { expected, found } => {
                write!(
                    f,
                    "expected exactly {expected} parameter range(s), found {found}"
                )
            }
            EvaluationError::InvalidRange {
                parameter,
                min,
                max,
            } => {
                write!(
                    f,
                    "invalid range for parameter {parameter:?}: [{min}, {max}]"
                )
            }
            EvaluationError::EmptyRangeTable => write!(f, "range table has no parameters"),
            EvaluationError::EmptySampleTable => write!(f, "parameter sample table has no rows"),
            EvaluationError::EmptyModelOutput { sample } => {
                write!(f, "model returned no strategy rows at sample {sample}")
            }
            EvaluationError::Model { sample, source } => {
                write!(f, "model evaluation failed at sample {sample}: {source}")
            }
            EvaluationError::Distribution(e) => write!(f, "{e}"),
            EvaluationError::Psa(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationError::Model { source, .. } => Some(source.as_ref()),
            EvaluationError::Distribution(e) => Some(e),
            EvaluationError::Psa(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DistributionError> for EvaluationError {
    fn from(e: DistributionError) -> Self {
        EvaluationError::Distribution(e)
    }
}

impl From<PsaError> for EvaluationError {
    fn from(e: PsaError) -> Self {
        EvaluationError::Psa(e)
    }
}

/// Errors raised constructing or querying a [`Psa`](crate::psa::Psa) object.
#[derive(Debug, Clone)]
pub enum PsaError {
    /// Cost and effect matrices disagree on the number of samples.
    SampleCountMismatch { cost: usize, effect: usize },
    /// Cost and effect matrices disagree on the number of strategies.
    StrategyCountMismatch { cost: usize, effect: usize },
    /// The supplied strategy name list does not match the matrix width.
    StrategyNameCount { names: usize, strategies: usize },
    /// The parameter sample table row count does not match the matrices.
    ParameterRowMismatch { rows: usize, samples: usize },
    /// The matrices have no strategy columns.
    NoStrategies,
    /// The matrices have no sample rows.
    NoSamples,
    /// A cost-dependent computation was requested on a PSA object built
    /// without a cost matrix.
    MissingCosts,
    /// A designated strategy name is not part of this PSA object.
    UnknownStrategy { name: String },
}

impl fmt::Display for PsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsaError::SampleCountMismatch { cost, effect } => {
                write!(
                    f,
                    "cost matrix has {cost} samples but effect matrix has {effect}"
                )
            }
            PsaError::StrategyCountMismatch { cost, effect } => {
                write!(
                    f,
                    "cost matrix has {cost} strategies but effect matrix has {effect}"
                )
            }
            PsaError::StrategyNameCount { names, strategies } => {
                write!(
                    f,
                    "{names} strategy name(s) supplied for {strategies} strategy column(s)"
                )
            }
            PsaError::ParameterRowMismatch { rows, samples } => {
                write!(
                    f,
                    "parameter table has {rows} row(s) but the matrices have {samples} sample(s)"
                )
            }
            PsaError::NoStrategies => write!(f, "PSA requires at least one strategy"),
            PsaError::NoSamples => write!(f, "PSA requires at least one sample"),
            PsaError::MissingCosts => {
                write!(f, "computation requires costs but none were supplied")
            }
            PsaError::UnknownStrategy { name } => {
                write!(f, "strategy {name:?} is not part of this analysis")
            }
        }
    }
}

impl std::error::Error for PsaError {}
