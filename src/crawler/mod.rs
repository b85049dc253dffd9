//! Crawl engine
//!
//! This module contains the resumable crawl logic:
//! - Term loop and per-term/per-item state machine
//! - Bounded retry around fallible backend operations
//! - Fixed UI locators for the driven app
//! - Overall run orchestration and shutdown handling

pub mod locators;
mod orchestrator;
mod retry;

pub use orchestrator::{CrawlReport, Orchestrator, TermPhase};
pub use retry::{with_retry, RetryPolicy};

use crate::backend::WebDriverSession;
use crate::config::Config;
use crate::state::CheckpointState;
use crate::storage::{CheckpointStore, FileCheckpointStore};
use crate::Result;
use std::sync::atomic::Ordering;

/// Runs a complete harvest against the configured automation backend
///
/// Loads (or, with `fresh`, ignores) the checkpoint, establishes the
/// backend session, wires ctrl-c to the cooperative shutdown flag, and
/// drives the orchestrator over the full term space. Connection failure is
/// the only error that escapes once the run has started.
pub async fn harvest(config: &Config, fresh: bool) -> Result<CrawlReport> {
    let store = FileCheckpointStore::from_config(&config.output);
    let state = if fresh {
        tracing::info!("Starting fresh, ignoring any existing checkpoint");
        CheckpointState::new()
    } else {
        store.load()?
    };

    let session = WebDriverSession::connect(&config.backend).await?;

    let mut orchestrator = Orchestrator::with_state(session, config.crawl.clone(), store, state);

    let shutdown = orchestrator.shutdown_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received; stopping after the current term");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    orchestrator.run().await
}
