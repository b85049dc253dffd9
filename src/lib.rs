//! Macroharvest: a resumable nutrition-database harvester
//!
//! This crate drives a UI-automation backend through the full space of
//! 3-letter search terms, extracts structured nutrition records from each
//! result, deduplicates them, and checkpoints both dataset and progress so
//! an interrupted run resumes where it left off.

pub mod backend;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod terms;

use thiserror::Error;

/// Main error type for macroharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] backend::BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid search term: {0}")]
    Term(#[from] terms::TermError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

/// Result type alias for macroharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use backend::{AutomationSession, BackendError, ElementRef, Locator};
pub use config::Config;
pub use crawler::{CrawlReport, Orchestrator};
pub use state::{CheckpointState, Dataset, FoodRecord, ProcessedTermSet};
pub use terms::{term_space, SearchTerm, TERM_SPACE_SIZE};
