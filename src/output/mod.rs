//! Output module for reporting harvest progress
//!
//! This module summarizes a checkpoint into human-readable statistics for
//! the `--stats` mode.

pub mod stats;

pub use stats::{compute_statistics, load_statistics, print_statistics, HarvestStatistics};
