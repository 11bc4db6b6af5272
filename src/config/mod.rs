//! Configuration module for the storefront crawler
//!
//! Settings come from an optional TOML file, are overridden by command-line
//! flags, and are validated before any network activity.
//!
//! # Example
//!
//! ```no_run
//! use storefront_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling store: {}", config.crawler.store);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, OutputConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
