//! Command implementations for the Lens CLI

pub mod compile;
pub mod metrics;
