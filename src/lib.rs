//! Storefront Crawler: archive the listings of a single eBay store
//!
//! This crate walks the paginated listing pages of one storefront, extracts
//! each item's title, price, condition and URL, and persists every item as its
//! own JSON record keyed by the storefront's item ID.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod logging;
pub mod output;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: listing::CrawlPhase,
        to: listing::CrawlPhase,
    },
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unsupported condition '{0}' (expected one of: New, Pre-Owned, Used)")]
    UnsupportedCondition(String),
}

/// Classification of a failed page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the configured timeout
    Timeout,
    /// The storefront could not be reached
    Connect,
    /// The storefront answered with a non-success status code
    Status(u16),
    /// The response body could not be read
    Body,
    /// Anything else (bad page index, malformed URL, ...)
    Other,
}

/// A listing page could not be fetched. Always terminates the crawl.
#[derive(Debug, Clone, Error)]
#[error("page {page}: {message}")]
pub struct FetchError {
    pub page: u32,
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(page: u32, kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            page,
            kind,
            message: message.into(),
        }
    }
}

/// A record could not be persisted. Item-local: the crawl carries on.
#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport, Outcome};
pub use listing::{Condition, CrawlPhase, ItemRecord};
