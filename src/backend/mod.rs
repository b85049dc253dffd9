//! UI-automation backend capability
//!
//! This module defines the contract the crawl engine depends on: an
//! exclusively-owned automation session that can locate elements, click
//! them, read their text, type into the search field, and navigate back.
//! The production adapter ([`WebDriverSession`]) binds the contract to the
//! WebDriver JSON protocol over HTTP; tests substitute scripted sessions.

mod webdriver;

pub use webdriver::WebDriverSession;

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors originating from the automation backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Session could not be established. Fatal; only possible at startup.
    #[error("failed to connect to automation backend: {0}")]
    Connection(String),

    /// A locator matched no element
    #[error("element not found: {0}")]
    NotFound(String),

    /// A bounded wait expired before the backend reached the expected state
    #[error("timed out after {0:?} waiting for backend state")]
    Timeout(Duration),

    /// Transport-level failure talking to the backend
    #[error("backend transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with something the adapter could not interpret
    #[error("backend protocol error: {0}")]
    Protocol(String),

    /// The backend rejected the session (stale or expired)
    #[error("backend session error: {0}")]
    Session(String),
}

/// How to locate an element inside the driven application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Match by resource id
    Id(String),

    /// Match by XPath expression
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    /// The WebDriver location strategy name
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::XPath(_) => "xpath",
        }
    }

    /// The strategy-specific selector value
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Opaque handle to an element inside the current view
///
/// Handles are only valid for the view they were found in; the backend may
/// invalidate them after navigation, which surfaces as a retryable error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub id: String,
}

/// The automation session contract the crawl engine drives
///
/// One session, exclusively owned, never shared or pooled. All operations
/// are fallible; the engine decides per call site whether a failure is
/// retried, skipped, or fatal.
#[async_trait]
pub trait AutomationSession: Send {
    /// Locates the given input field, focuses it, clears any previous text,
    /// and types `text`
    async fn enter_search_text(&self, locator: &Locator, text: &str) -> Result<(), BackendError>;

    /// Finds every element matching the locator (possibly none)
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, BackendError>;

    /// Finds exactly one element, or fails with [`BackendError::NotFound`]
    async fn find_one(&self, locator: &Locator) -> Result<ElementRef, BackendError>;

    /// Clicks an element
    async fn click(&self, element: &ElementRef) -> Result<(), BackendError>;

    /// Reads the visible text of an element
    async fn element_text(&self, element: &ElementRef) -> Result<String, BackendError>;

    /// Navigates one view back
    async fn navigate_back(&self) -> Result<(), BackendError>;

    /// Ends the session. Best-effort; callers log failures and move on.
    async fn close(&mut self) -> Result<(), BackendError>;
}

/// Polls an async predicate until it holds or the timeout expires
///
/// The predicate is evaluated immediately, then every `poll_interval` until
/// `timeout` has elapsed. Returns [`BackendError::Timeout`] on expiry;
/// predicate errors propagate unchanged. This is a cooperative wait: no
/// other crawl work proceeds while polling.
pub async fn wait_for_condition<F, Fut>(
    mut condition: F,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, BackendError>>,
{
    let started = tokio::time::Instant::now();
    loop {
        if condition().await? {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(BackendError::Timeout(timeout));
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_locator_strategy_and_value() {
        let by_id = Locator::id("com.example:id/field");
        assert_eq!(by_id.strategy(), "id");
        assert_eq!(by_id.value(), "com.example:id/field");

        let by_xpath = Locator::xpath("//widget[@text='Go']");
        assert_eq!(by_xpath.strategy(), "xpath");
        assert_eq!(by_xpath.value(), "//widget[@text='Go']");
    }

    #[test]
    fn test_locator_display() {
        let loc = Locator::id("x");
        assert_eq!(loc.to_string(), "id=x");
    }

    #[tokio::test]
    async fn test_wait_succeeds_immediately() {
        let result = wait_for_condition(
            || async { Ok(true) },
            Duration::from_millis(50),
            Duration::from_millis(5),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_succeeds_after_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = calls.clone();
        let result = wait_for_condition(
            move || {
                let calls = calls_in.clone();
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 2) }
            },
            Duration::from_secs(1),
            Duration::from_millis(1),
        )
        .await;
        assert!(result.is_ok());
        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let timeout = Duration::from_millis(20);
        let result = wait_for_condition(
            || async { Ok(false) },
            timeout,
            Duration::from_millis(5),
        )
        .await;
        match result {
            Err(BackendError::Timeout(t)) => assert_eq!(t, timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_propagates_predicate_error() {
        let result = wait_for_condition(
            || async { Err(BackendError::Session("gone".to_string())) },
            Duration::from_millis(50),
            Duration::from_millis(5),
        )
        .await;
        assert!(matches!(result, Err(BackendError::Session(_))));
    }
}
