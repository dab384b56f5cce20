//! Decision-analytic metrics layered on top of the PSA object.

mod metrics;

pub use metrics::*;
