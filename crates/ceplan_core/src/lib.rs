//! Probabilistic and deterministic sensitivity analysis for
//! decision-analytic cost-effectiveness models.
//!
//! The crate does not implement any disease or cost model itself. A model is
//! supplied externally as a [`DecisionModel`](evaluate::DecisionModel) - a
//! mapping from a named parameter set to one outcome row per strategy - and
//! this crate provides everything around it:
//! - sampling parameter sets from probability distributions
//!   ([`model::ParamDistribution`], [`model::sample_parameters`]),
//! - driving repeated model evaluation over samples or deterministic grids
//!   ([`evaluate::run_psa`], [`evaluate::run_owsa`], [`evaluate::run_twsa`]),
//! - and the downstream cost-effectiveness computations: ICERs and the
//!   efficiency frontier ([`psa::Psa`], [`frontier`]), expected loss, CEAC
//!   and EVPI ([`analysis`]).
//!
//! # Example
//!
//! ```ignore
//! use ceplan_core::evaluate::run_psa;
//! use ceplan_core::model::{ParamDistribution, ParameterSpec, sample_parameters};
//!
//! let specs = vec![
//!     ParameterSpec::new("p_response", ParamDistribution::BetaMoments { mean: 0.4, sd: 0.05 }),
//!     ParameterSpec::new("c_treatment", ParamDistribution::GammaMoments { mean: 1200.0, sd: 300.0 }),
//! ];
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
//! let samples = sample_parameters(&specs, 1000, &mut rng)?;
//! let psa = run_psa(&my_model, &base_case, &samples, None)?
//!     .into_psa(Some("cost"), "qaly", "$", "QALY")?;
//! let table = psa.icers()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod evaluate;
pub mod frontier;
pub mod psa;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{DistributionError, EvaluationError, ModelError, PsaError};
pub use evaluate::{DecisionModel, Progress, run_owsa, run_psa, run_twsa};
pub use model::{ParamDistribution, ParamSet, ParameterRange, ParameterSpec, sample_parameters};
pub use psa::{Psa, SampleMatrix};
