//! Frequency analysis of the loaded survey table.

pub mod aggregator;

pub use aggregator::*;
