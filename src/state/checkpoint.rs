//! Resumable checkpoint state

use crate::state::{Dataset, ProcessedTermSet};

/// The full resumable state of a harvest run
///
/// The dataset and the processed-term set are always flushed together, so
/// the two never drift relative to each other beyond the window between
/// flushes. Loaded once at startup (absent files yield the empty state),
/// mutated only by the orchestrator, flushed on the save cadence and
/// unconditionally at process end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointState {
    pub dataset: Dataset,
    pub processed: ProcessedTermSet,
}

impl CheckpointState {
    /// Creates an empty checkpoint (fresh run)
    pub fn new() -> Self {
        Self::default()
    }
}
