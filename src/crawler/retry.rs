//! Bounded retry around fallible backend operations

use crate::backend::BackendError;
use crate::config::CrawlConfig;
use std::future::Future;
use std::time::Duration;

/// Attempt budget and inter-attempt delay for one retried operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            max_attempts: config.retry_attempts,
            delay: config.retry_delay(),
        }
    }
}

/// Runs `op` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between attempts
///
/// Every backend failure is treated as equally retryable; there is no
/// failure-kind discrimination. When the budget is exhausted the last error
/// is returned, and whether that abandons a term, skips an item, or aborts
/// the run is entirely the caller's decision.
pub async fn with_retry<T, F, Fut>(
    what: &str,
    policy: RetryPolicy,
    mut op: F,
) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut failures = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                failures += 1;
                if failures >= policy.max_attempts {
                    return Err(e);
                }
                tracing::warn!(
                    "{} failed: {}. Retrying ({}/{})...",
                    what,
                    e,
                    failures,
                    policy.max_attempts - 1
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
