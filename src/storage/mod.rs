//! Durable checkpoint storage
//!
//! The checkpoint is two flat text files rewritten in full on every save:
//! a tabular dataset file (six fixed columns) and a processed-terms file
//! (one term per line). Absent files load as the empty state. Saves are not
//! atomic; a crash mid-save can leave the pair inconsistent, which the
//! bounded flush cadence keeps acceptable.

mod dataset_file;
mod terms_file;
mod writer;

pub use dataset_file::{read_dataset, write_dataset, DATASET_HEADER};
pub use terms_file::{read_terms, write_terms};
pub use writer::PersistenceWriter;

use crate::config::OutputConfig;
use crate::state::CheckpointState;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during checkpoint storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed dataset file: {0}")]
    MalformedDataset(String),

    #[error("Malformed terms file: {0}")]
    MalformedTerms(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint storage backends
///
/// The dataset and the processed-term set are loaded and saved as one unit
/// so resume never observes one half ahead of the other by more than the
/// flush window.
pub trait CheckpointStore {
    /// Loads the checkpoint; absent files yield the empty state
    fn load(&self) -> StorageResult<CheckpointState>;

    /// Overwrites both checkpoint files with the given state
    fn save(&self, state: &CheckpointState) -> StorageResult<()>;
}

/// Filesystem-backed checkpoint store
pub struct FileCheckpointStore {
    dataset_path: PathBuf,
    terms_path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(dataset_path: impl Into<PathBuf>, terms_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            terms_path: terms_path.into(),
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(&output.dataset_path, &output.terms_path)
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn terms_path(&self) -> &Path {
        &self.terms_path
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> StorageResult<CheckpointState> {
        let dataset = if self.dataset_path.exists() {
            let dataset = read_dataset(&self.dataset_path)?;
            tracing::info!(
                "Loaded existing dataset: {} records from {}",
                dataset.len(),
                self.dataset_path.display()
            );
            dataset
        } else {
            tracing::info!("No existing dataset found, starting fresh");
            Default::default()
        };

        let processed = if self.terms_path.exists() {
            let processed = read_terms(&self.terms_path)?;
            tracing::info!(
                "Loaded {} processed terms from {}",
                processed.len(),
                self.terms_path.display()
            );
            processed
        } else {
            tracing::info!("No processed-terms file found, starting fresh");
            Default::default()
        };

        Ok(CheckpointState { dataset, processed })
    }

    fn save(&self, state: &CheckpointState) -> StorageResult<()> {
        write_dataset(&self.dataset_path, &state.dataset)?;
        write_terms(&self.terms_path, &state.processed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FoodRecord;
    use tempfile::TempDir;

    fn record(name: &str) -> FoodRecord {
        FoodRecord {
            name: name.to_string(),
            proteins: "12g".to_string(),
            carbs: "30g".to_string(),
            fats: "4g".to_string(),
            fiber: "2g".to_string(),
            details: "1 bowl (150g)".to_string(),
        }
    }

    fn store_in(dir: &TempDir) -> FileCheckpointStore {
        FileCheckpointStore::new(
            dir.path().join("dataset.csv"),
            dir.path().join("terms.txt"),
        )
    }

    #[test]
    fn test_load_missing_files_yields_empty_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let state = store.load().unwrap();
        assert!(state.dataset.is_empty());
        assert!(state.processed.is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut state = CheckpointState::new();
        state.dataset.insert(record("Oats"));
        state.dataset.insert(record("Almond, roasted"));
        state.processed.mark_processed("abc".parse().unwrap());
        state.processed.mark_processed("abd".parse().unwrap());

        store.save(&state).unwrap();
        let reloaded = store.load().unwrap();

        assert_eq!(reloaded, state);
        // Insertion order is preserved for the record list
        assert_eq!(reloaded.dataset.records()[0].name, "Oats");
        assert_eq!(reloaded.dataset.records()[1].name, "Almond, roasted");
    }

    #[test]
    fn test_save_overwrites_previous_checkpoint() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut first = CheckpointState::new();
        first.dataset.insert(record("Oats"));
        first.processed.mark_processed("aaa".parse().unwrap());
        store.save(&first).unwrap();

        let mut second = CheckpointState::new();
        second.dataset.insert(record("Banana"));
        store.save(&second).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, second);
        assert!(reloaded.processed.is_empty());
    }

    #[test]
    fn test_partial_checkpoint_loads_remaining_half() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // Only the terms file exists
        write_terms(store.terms_path(), &["abc".parse().unwrap()].into_iter().collect())
            .unwrap();

        let state = store.load().unwrap();
        assert!(state.dataset.is_empty());
        assert_eq!(state.processed.len(), 1);
    }
}
