use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    validate_store_name(&config.store)?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_writes < 1 || config.max_concurrent_writes > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_writes must be between 1 and 100, got {}",
            config.max_concurrent_writes
        )));
    }

    Ok(())
}

/// Validates the store name
///
/// The name is used both as a URL path segment and as a directory name, so it
/// is limited to alphanumerics, `-`, `_` and `.`, and may not be `.` or `..`.
fn validate_store_name(store: &str) -> ConfigResult<()> {
    if store.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store name cannot be empty".to_string(),
        ));
    }

    if !store
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "store name must contain only alphanumeric characters, '-', '_' or '.', got '{}'",
            store
        )));
    }

    if store == "." || store == ".." {
        return Err(ConfigError::Validation(format!(
            "store name cannot be '{}'",
            store
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    if config.log_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
