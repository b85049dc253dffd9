use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for macroharvest
///
/// Every section and field has a built-in default equal to the fixed
/// capability set the harvester ships with, so the binary runs with no
/// config file at all; a TOML file overrides selectively.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// Automation backend endpoint and device capabilities
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Automation server endpoint
    pub endpoint: String,

    /// Target platform name
    #[serde(rename = "platform-name")]
    pub platform_name: String,

    /// Target platform version
    #[serde(rename = "platform-version")]
    pub platform_version: String,

    /// Device identifier
    #[serde(rename = "device-name")]
    pub device_name: String,

    /// Automation driver name
    #[serde(rename = "automation-name")]
    pub automation_name: String,

    /// Keep application state between sessions
    #[serde(rename = "no-reset")]
    pub no_reset: bool,

    /// Server-side idle command timeout (seconds)
    #[serde(rename = "new-command-timeout")]
    pub new_command_timeout: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4723/wd/hub".to_string(),
            platform_name: "Android".to_string(),
            platform_version: "12".to_string(),
            device_name: "emulator-5554".to_string(),
            automation_name: "UiAutomator2".to_string(),
            no_reset: true,
            new_command_timeout: 3600,
        }
    }
}

/// Crawl engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Total attempts per fallible backend operation (first try included)
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Delay between retry attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Bounded wait for the search input field (milliseconds)
    #[serde(rename = "search-input-wait-ms")]
    pub search_input_wait_ms: u64,

    /// Bounded wait for search results to appear (milliseconds)
    #[serde(rename = "results-wait-ms")]
    pub results_wait_ms: u64,

    /// Bounded wait for the detail page-ready marker (milliseconds)
    #[serde(rename = "detail-wait-ms")]
    pub detail_wait_ms: u64,

    /// Poll interval inside bounded waits (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Checkpoint flush cadence, counted in processed terms
    #[serde(rename = "save-every-terms")]
    pub save_every_terms: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 2,
            retry_delay_ms: 5_000,
            search_input_wait_ms: 15_000,
            results_wait_ms: 20_000,
            detail_wait_ms: 20_000,
            poll_interval_ms: 500,
            save_every_terms: 10,
        }
    }
}

impl CrawlConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn search_input_wait(&self) -> Duration {
        Duration::from_millis(self.search_input_wait_ms)
    }

    pub fn results_wait(&self) -> Duration {
        Duration::from_millis(self.results_wait_ms)
    }

    pub fn detail_wait(&self) -> Duration {
        Duration::from_millis(self.detail_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Checkpoint file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the dataset file (tabular text)
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Path to the processed-terms file (one term per line)
    #[serde(rename = "terms-path")]
    pub terms_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: "food_details_dataset.csv".to_string(),
            terms_path: "processed_terms.txt".to_string(),
        }
    }
}
