use crate::config::types::{BackendConfig, Config, CrawlConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_backend_config(&config.backend)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates backend endpoint and capability fields
fn validate_backend_config(config: &BackendConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidEndpoint(format!(
            "endpoint must be http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    for (field, value) in [
        ("platform-name", &config.platform_name),
        ("device-name", &config.device_name),
        ("automation-name", &config.automation_name),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{field} cannot be empty")));
        }
    }

    Ok(())
}

/// Validates crawl engine limits
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be >= 1, got {}",
            config.retry_attempts
        )));
    }

    if config.poll_interval_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be >= 10ms, got {}ms",
            config.poll_interval_ms
        )));
    }

    for (field, value) in [
        ("search-input-wait-ms", config.search_input_wait_ms),
        ("results-wait-ms", config.results_wait_ms),
        ("detail-wait-ms", config.detail_wait_ms),
    ] {
        if value < config.poll_interval_ms {
            return Err(ConfigError::Validation(format!(
                "{field} ({value}ms) must be >= poll-interval-ms ({}ms)",
                config.poll_interval_ms
            )));
        }
    }

    if config.save_every_terms < 1 {
        return Err(ConfigError::Validation(format!(
            "save-every-terms must be >= 1, got {}",
            config.save_every_terms
        )));
    }

    Ok(())
}

/// Validates checkpoint file paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    if config.terms_path.is_empty() {
        return Err(ConfigError::Validation(
            "terms-path cannot be empty".to_string(),
        ));
    }

    if config.dataset_path == config.terms_path {
        return Err(ConfigError::Validation(
            "dataset-path and terms-path must differ".to_string(),
        ));
    }

    Ok(())
}
