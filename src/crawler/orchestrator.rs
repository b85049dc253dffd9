//! Crawl orchestration: the per-term/per-item state machine
//!
//! The orchestrator owns the checkpoint state and the automation session,
//! walks the term space in order (skipping terms already processed),
//! retries fallible backend interactions, consults the dataset's duplicate
//! index before accepting records, and drives the persistence cadence.

use crate::backend::{wait_for_condition, AutomationSession, BackendError, ElementRef, Locator};
use crate::config::CrawlConfig;
use crate::crawler::locators;
use crate::crawler::retry::{with_retry, RetryPolicy};
use crate::state::{CheckpointState, FoodRecord};
use crate::storage::{CheckpointStore, PersistenceWriter};
use crate::terms::{term_space, SearchTerm, TERM_SPACE_SIZE};
use crate::HarvestError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where a term currently is in its processing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermPhase {
    /// Nothing submitted yet
    Idle,

    /// Term has been typed into the search input
    Searching,

    /// A non-empty result set is visible and snapshotted
    ResultsLoaded,

    /// A result's detail view is open
    ItemOpened,

    /// The open item was read and accepted into the dataset
    Extracted,

    /// The open item's name was already captured; record discarded
    Duplicate,

    /// Every snapshotted item has been handled; term is marked processed
    TermComplete,
}

impl TermPhase {
    /// Returns true when no further processing happens for the term
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TermComplete)
    }
}

impl fmt::Display for TermPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::ResultsLoaded => "results_loaded",
            Self::ItemOpened => "item_opened",
            Self::Extracted => "extracted",
            Self::Duplicate => "duplicate",
            Self::TermComplete => "term_complete",
        };
        f.write_str(name)
    }
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Terms that reached TermComplete this run
    pub terms_completed: u32,

    /// Terms abandoned after retry exhaustion (still eligible next run)
    pub terms_abandoned: u32,

    /// Records accepted into the dataset
    pub records_added: u32,

    /// Items discarded because their name was already captured
    pub duplicates_skipped: u32,

    /// Items skipped after retry exhaustion
    pub items_skipped: u32,

    /// True if the run stopped on an interrupt signal
    pub interrupted: bool,
}

/// Outcome of processing one term
enum TermOutcome {
    Completed,
    Abandoned,
}

/// Drives the crawl: term loop, state machine, retries, persistence
pub struct Orchestrator<S, C> {
    session: S,
    crawl: CrawlConfig,
    state: CheckpointState,
    writer: PersistenceWriter<C>,
    shutdown: Arc<AtomicBool>,
    phase: TermPhase,
    report: CrawlReport,
}

impl<S: AutomationSession, C: CheckpointStore> Orchestrator<S, C> {
    /// Creates an orchestrator, loading the checkpoint from the store
    ///
    /// With `fresh` set, any existing checkpoint is ignored and the run
    /// starts from the empty state.
    pub fn new(session: S, crawl: CrawlConfig, store: C, fresh: bool) -> Result<Self, HarvestError> {
        let state = if fresh {
            tracing::info!("Starting fresh, ignoring any existing checkpoint");
            CheckpointState::new()
        } else {
            store.load()?
        };
        Ok(Self::with_state(session, crawl, store, state))
    }

    /// Creates an orchestrator around an already-loaded checkpoint
    pub fn with_state(session: S, crawl: CrawlConfig, store: C, state: CheckpointState) -> Self {
        let save_every = crawl.save_every_terms;
        Self {
            session,
            crawl,
            state,
            writer: PersistenceWriter::new(store, save_every),
            shutdown: Arc::new(AtomicBool::new(false)),
            phase: TermPhase::Idle,
            report: CrawlReport::default(),
        }
    }

    /// Handle for requesting cooperative shutdown
    ///
    /// Setting the flag stops the run at the next term boundary; the term
    /// in flight is finished first, then state is flushed and the session
    /// released.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// The current checkpoint state
    pub fn state(&self) -> &CheckpointState {
        &self.state
    }

    /// Runs the crawl over the full term space
    pub async fn run(&mut self) -> Result<CrawlReport, HarvestError> {
        self.run_over(term_space()).await
    }

    /// Runs the crawl over an arbitrary term sequence
    ///
    /// Terms already in the processed set are skipped. The interrupt flag is
    /// observed at term granularity only. State is flushed and the session
    /// closed on every exit path.
    pub async fn run_over(
        &mut self,
        terms: impl Iterator<Item = SearchTerm>,
    ) -> Result<CrawlReport, HarvestError> {
        tracing::info!(
            "Starting harvest: {} records captured, {}/{} terms already processed",
            self.state.dataset.len(),
            self.state.processed.len(),
            TERM_SPACE_SIZE
        );

        for term in terms {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Interrupt observed, stopping before term '{}'", term);
                self.report.interrupted = true;
                break;
            }
            if self.state.processed.contains(term) {
                continue;
            }

            self.set_phase(TermPhase::Idle);
            match self.process_term(term).await {
                Ok(TermOutcome::Completed) => self.report.terms_completed += 1,
                Ok(TermOutcome::Abandoned) => self.report.terms_abandoned += 1,
                Err(e) => {
                    // Contained at term granularity: log and move on
                    tracing::error!("Unexpected error while processing term '{}': {}", term, e);
                    self.report.terms_abandoned += 1;
                }
            }
            self.writer.record_term_done(&self.state);
        }

        self.writer.final_flush(&self.state);

        match self.session.close().await {
            Ok(()) => tracing::info!("Automation session closed"),
            Err(e) => tracing::warn!("Failed to close automation session: {}", e),
        }

        self.log_summary();
        Ok(self.report.clone())
    }

    /// Processes one term through the full state machine
    async fn process_term(&mut self, term: SearchTerm) -> Result<TermOutcome, HarvestError> {
        tracing::info!(
            "Processing search term ({}/{}): '{}'",
            term.index() + 1,
            TERM_SPACE_SIZE,
            term
        );
        let policy = RetryPolicy::from_config(&self.crawl);

        self.set_phase(TermPhase::Searching);
        let searched = with_retry("search", policy, || self.search_and_snapshot(term)).await;
        let snapshot = match searched {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Not marked processed: the term stays eligible next run
                tracing::warn!("Abandoning term '{}' after retries: {}", term, e);
                return Ok(TermOutcome::Abandoned);
            }
        };
        self.set_phase(TermPhase::ResultsLoaded);
        tracing::debug!("{} results loaded for '{}'", snapshot.len(), term);

        for (index, element) in snapshot.iter().enumerate() {
            tracing::info!("Processing result {} of {}...", index + 1, snapshot.len());
            let opened = with_retry("item", policy, || self.open_item_and_read(element)).await;
            match opened {
                Err(e) => {
                    tracing::warn!(
                        "Skipping result {} for '{}' after retries: {}",
                        index + 1,
                        term,
                        e
                    );
                    self.report.items_skipped += 1;
                }
                Ok(record) => {
                    self.set_phase(TermPhase::ItemOpened);
                    if self.state.dataset.is_duplicate(&record.name) {
                        tracing::info!("Duplicate entry for '{}', discarding", record.name);
                        self.report.duplicates_skipped += 1;
                        self.set_phase(TermPhase::Duplicate);
                    } else {
                        tracing::info!(
                            "Extracted '{}': proteins={}, carbs={}, fats={}, fiber={}",
                            record.name,
                            record.proteins,
                            record.carbs,
                            record.fats,
                            record.fiber
                        );
                        self.state.dataset.insert(record);
                        self.report.records_added += 1;
                        self.set_phase(TermPhase::Extracted);
                    }
                    if let Err(e) = self.session.navigate_back().await {
                        tracing::warn!("Failed to navigate back from detail view: {}", e);
                    }
                }
            }
            self.set_phase(TermPhase::ResultsLoaded);
        }

        self.state.processed.mark_processed(term);
        self.set_phase(TermPhase::TermComplete);
        Ok(TermOutcome::Completed)
    }

    /// Types the term and waits for a non-empty result-marker set
    ///
    /// Returns the element snapshot taken the moment results appeared; the
    /// item loop iterates that snapshot even if the backend re-renders.
    async fn search_and_snapshot(&self, term: SearchTerm) -> Result<Vec<ElementRef>, BackendError> {
        let session = &self.session;

        let input = locators::search_input();
        let input_ref = &input;
        wait_for_condition(
            move || async move {
                match session.find_one(input_ref).await {
                    Ok(_) => Ok(true),
                    Err(BackendError::NotFound(_)) => Ok(false),
                    Err(e) => Err(e),
                }
            },
            self.crawl.search_input_wait(),
            self.crawl.poll_interval(),
        )
        .await?;

        session.enter_search_text(&input, term.as_str()).await?;
        tracing::debug!("Search term '{}' entered", term);

        let marker = locators::result_marker();
        let marker_ref = &marker;
        wait_for_condition(
            move || async move { Ok(!session.find_all(marker_ref).await?.is_empty()) },
            self.crawl.results_wait(),
            self.crawl.poll_interval(),
        )
        .await?;

        session.find_all(&marker).await
    }

    /// Opens one result's detail view and reads the six record fields
    async fn open_item_and_read(&self, element: &ElementRef) -> Result<FoodRecord, BackendError> {
        let session = &self.session;

        session.click(element).await?;

        let ready = locators::detail_ready();
        let ready_ref = &ready;
        wait_for_condition(
            move || async move {
                match session.find_one(ready_ref).await {
                    Ok(_) => Ok(true),
                    Err(BackendError::NotFound(_)) => Ok(false),
                    Err(e) => Err(e),
                }
            },
            self.crawl.detail_wait(),
            self.crawl.poll_interval(),
        )
        .await?;

        Ok(FoodRecord {
            name: self.read_field(&locators::item_title()).await?,
            proteins: self.read_field(&locators::proteins()).await?,
            carbs: self.read_field(&locators::carbs()).await?,
            fats: self.read_field(&locators::fats()).await?,
            fiber: self.read_field(&locators::fiber()).await?,
            details: self.read_field(&locators::item_details()).await?,
        })
    }

    async fn read_field(&self, locator: &Locator) -> Result<String, BackendError> {
        let element = self.session.find_one(locator).await?;
        self.session.element_text(&element).await
    }

    fn set_phase(&mut self, next: TermPhase) {
        tracing::trace!("term phase: {} -> {}", self.phase, next);
        self.phase = next;
    }

    fn log_summary(&self) {
        tracing::info!(
            "Harvest run finished{}: {} terms completed, {} abandoned, {} records added, {} duplicates discarded, {} items skipped",
            if self.report.interrupted {
                " (interrupted)"
            } else {
                ""
            },
            self.report.terms_completed,
            self.report.terms_abandoned,
            self.report.records_added,
            self.report.duplicates_skipped,
            self.report.items_skipped
        );
    }
}
