//! HTTP fetcher implementation
//!
//! This module handles the storefront requests of the crawler:
//! - Building the HTTP client with timeouts and the configured user agent
//! - Building listing page URLs from store name and page index
//! - GET requests for listing pages
//! - Error classification
//!
//! There is no retry loop: any failure is reported to the coordinator, which
//! ends the crawl.

use crate::config::FetchConfig;
use crate::{CrawlerError, FetchError, FetchErrorKind};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Query parameter the storefront uses for its page index
const PAGE_PARAM: &str = "_pgn";

/// A listing page as returned by the storefront
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Page index, 1-based
    pub page: u32,
    /// URL the page was requested from
    pub url: Url,
    /// Response body
    pub html: String,
}

/// Source of listing pages
pub trait PageFetcher {
    /// Fetches listing page `page` (1-based) of `store`
    fn fetch(
        &self,
        store: &str,
        page: u32,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use storefront_crawler::config::FetchConfig;
/// use storefront_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the URL of listing page `page` of `store`
///
/// The storefront serves a seller's listings at `/sch/<store>/m.html` and
/// paginates with the `_pgn` query parameter.
pub fn listing_url(base_url: &Url, store: &str, page: u32) -> Result<Url, url::ParseError> {
    let mut url = base_url.join(&format!("/sch/{}/m.html", store))?;
    url.query_pairs_mut()
        .append_pair(PAGE_PARAM, &page.to_string());
    Ok(url)
}

/// Fetches listing pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Creates a fetcher for the storefront at `config.base_url`
    pub fn new(config: &FetchConfig) -> Result<Self, CrawlerError> {
        let client = build_http_client(config)?;
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self { client, base_url })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, store: &str, page: u32) -> Result<FetchedPage, FetchError> {
        if page == 0 {
            return Err(FetchError::new(
                page,
                FetchErrorKind::Other,
                "page index must be >= 1",
            ));
        }

        let url = listing_url(&self.base_url, store, page).map_err(|e| {
            FetchError::new(page, FetchErrorKind::Other, format!("invalid page URL: {}", e))
        })?;

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(page, &url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                page,
                FetchErrorKind::Status(status.as_u16()),
                format!("HTTP {} from {}", status.as_u16(), url),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| classify_error(page, &url, &e))?;

        Ok(FetchedPage { page, url, html })
    }
}

/// Maps a reqwest error onto a `FetchError`
fn classify_error(page: u32, url: &Url, e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::new(
            page,
            FetchErrorKind::Timeout,
            format!("request timeout for {}", url),
        )
    } else if e.is_connect() {
        FetchError::new(
            page,
            FetchErrorKind::Connect,
            format!("connection failed for {}: {}", url, e),
        )
    } else if e.is_body() || e.is_decode() {
        FetchError::new(
            page,
            FetchErrorKind::Body,
            format!("failed to read body of {}: {}", url, e),
        )
    } else {
        FetchError::new(page, FetchErrorKind::Other, format!("{}: {}", url, e))
    }
}
