//! Statistics generation from checkpoint state

use crate::state::CheckpointState;
use crate::storage::CheckpointStore;
use crate::terms::TERM_SPACE_SIZE;
use crate::HarvestError;

/// Harvest progress summary
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestStatistics {
    /// Records captured so far
    pub total_records: usize,

    /// Terms fully processed so far
    pub terms_processed: usize,

    /// Terms still eligible for processing
    pub terms_remaining: usize,

    /// Share of the term space already processed, in percent
    pub completion_percent: f64,
}

/// Loads the checkpoint and computes statistics from it
pub fn load_statistics(store: &dyn CheckpointStore) -> Result<HarvestStatistics, HarvestError> {
    let state = store.load()?;
    Ok(compute_statistics(&state))
}

/// Computes statistics from an in-memory checkpoint
pub fn compute_statistics(state: &CheckpointState) -> HarvestStatistics {
    let terms_processed = state.processed.len();
    HarvestStatistics {
        total_records: state.dataset.len(),
        terms_processed,
        terms_remaining: TERM_SPACE_SIZE - terms_processed,
        completion_percent: (terms_processed as f64 / TERM_SPACE_SIZE as f64) * 100.0,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Records captured: {}", stats.total_records);
    println!(
        "Terms processed: {} of {} ({:.1}%)",
        stats.terms_processed, TERM_SPACE_SIZE, stats.completion_percent
    );
    println!("Terms remaining: {}", stats.terms_remaining);

    if stats.terms_processed > 0 {
        println!(
            "Records per processed term: {:.2}",
            stats.total_records as f64 / stats.terms_processed as f64
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FoodRecord;

    fn record(name: &str) -> FoodRecord {
        FoodRecord {
            name: name.to_string(),
            proteins: "1g".to_string(),
            carbs: "2g".to_string(),
            fats: "3g".to_string(),
            fiber: "4g".to_string(),
            details: "x".to_string(),
        }
    }

    #[test]
    fn test_empty_state() {
        let stats = compute_statistics(&CheckpointState::new());
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.terms_processed, 0);
        assert_eq!(stats.terms_remaining, TERM_SPACE_SIZE);
        assert_eq!(stats.completion_percent, 0.0);
    }

    #[test]
    fn test_counts_and_completion() {
        let mut state = CheckpointState::new();
        state.dataset.insert(record("Oats"));
        state.dataset.insert(record("Almonds"));
        for t in ["aaa", "aab", "aac", "aad"] {
            state.processed.mark_processed(t.parse().unwrap());
        }

        let stats = compute_statistics(&state);
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.terms_processed, 4);
        assert_eq!(stats.terms_remaining, TERM_SPACE_SIZE - 4);
        assert!(stats.completion_percent > 0.0 && stats.completion_percent < 1.0);
    }
}
