//! Integration tests for the PSA/DSA engine
//!
//! Tests are organized by topic:
//! - `distributions` - Distribution sampling and moment reparameterization
//! - `evaluate` - The model evaluation driver (PSA, one-way, two-way)
//! - `psa` - PSA object construction, ICERs and the frontier
//! - `metrics` - Expected loss, CEAC and EVPI

mod distributions;
mod psa;
