//! Type definitions for the PSA/DSA engine: parameter distributions, sampled
//! parameter tables, and the typed interchange records shared with the
//! evaluation driver and downstream metrics.

mod distributions;
mod outcomes;
mod params;

pub use distributions::*;
pub use outcomes::*;
pub use params::*;
