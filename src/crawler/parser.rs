//! Listing page parser
//!
//! Turns one storefront listing page into item records. Extraction is pure:
//! the same HTML always produces the same records in the same order.
//!
//! Malformed listings degrade gracefully. A container without a title, a link
//! or a recognisable item ID is skipped and reported, the rest of the page is
//! still extracted.

use crate::crawler::dom::HtmlNode;
use crate::listing::ItemRecord;
use scraper::Html;
use std::fmt;
use url::Url;

const CONTAINER_SELECTOR: &str = "li.s-item";
const TITLE_SELECTOR: &str = ".s-item__title";
const PRICE_SELECTOR: &str = ".s-item__price";
const LINK_SELECTOR: &str = "a.s-item__link";
const CONDITION_SELECTOR: &str = ".SECONDARY_INFO";
const NEXT_PAGE_SELECTOR: &str = "a.pagination__next";

const MISSING_PRICE: &str = "0.00";
const MISSING_CONDITION: &str = "Unknown";

/// Records extracted from one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedListing {
    /// Extracted records in document order
    pub items: Vec<ItemRecord>,

    /// Listing containers that could not be turned into a record
    pub skipped: Vec<ParseDegradation>,

    /// Whether the page links to a further page
    pub has_next_page: bool,
}

/// Why a listing container was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDegradation {
    /// No title element, or an empty one
    MissingTitle,

    /// No product link, or an href that does not resolve
    MissingUrl { title: String },

    /// The product URL carries no item ID
    MissingItemId { url: String },
}

impl fmt::Display for ParseDegradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "listing has no title"),
            Self::MissingUrl { title } => write!(f, "listing '{}' has no product URL", title),
            Self::MissingItemId { url } => write!(f, "could not extract item ID from URL: {}", url),
        }
    }
}

/// Parses a listing page
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - The URL the page was fetched from, used to resolve relative links
///
/// # Example
///
/// ```
/// use storefront_crawler::crawler::parse_listing;
/// use url::Url;
///
/// let html = r#"<ul><li class="s-item">
///     <div class="s-item__title">Laptop</div>
///     <a class="s-item__link" href="https://www.ebay.com/itm/123">view</a>
/// </li></ul>"#;
/// let page_url = Url::parse("https://www.ebay.com/sch/shop/m.html").unwrap();
/// let parsed = parse_listing(html, &page_url);
/// assert_eq!(parsed.items[0].item_id, "123");
/// assert!(!parsed.has_next_page);
/// ```
pub fn parse_listing(html: &str, page_url: &Url) -> ParsedListing {
    let document = Html::parse_document(html);
    extract_listing(&document.root_element(), page_url)
}

/// Extracts records and the next-page flag from an already parsed document
pub fn extract_listing<N: HtmlNode>(root: &N, page_url: &Url) -> ParsedListing {
    let mut items = Vec::new();
    let mut skipped = Vec::new();

    for container in root.select_all(CONTAINER_SELECTOR) {
        match extract_item(&container, page_url) {
            Ok(record) => {
                tracing::debug!(
                    "Parsed item {}: {} ({}) - ${}",
                    record.item_id,
                    record.title,
                    record.condition,
                    record.price
                );
                items.push(record);
            }
            Err(reason) => {
                if matches!(reason, ParseDegradation::MissingItemId { .. }) {
                    tracing::warn!("Skipping listing: {}", reason);
                } else {
                    tracing::debug!("Skipping listing: {}", reason);
                }
                skipped.push(reason);
            }
        }
    }

    ParsedListing {
        items,
        skipped,
        has_next_page: has_next_page(root),
    }
}

/// Extracts one record from a listing container
fn extract_item<N: HtmlNode>(
    container: &N,
    page_url: &Url,
) -> Result<ItemRecord, ParseDegradation> {
    let title = container
        .select_first(TITLE_SELECTOR)
        .map(|node| node.text())
        .filter(|text| !text.is_empty())
        .ok_or(ParseDegradation::MissingTitle)?;

    let product_url = container
        .select_first(LINK_SELECTOR)
        .and_then(|node| node.attr("href"))
        .and_then(|href| resolve_link(&href, page_url))
        .ok_or_else(|| ParseDegradation::MissingUrl {
            title: title.clone(),
        })?;

    let price = container
        .select_first(PRICE_SELECTOR)
        .map(|node| normalize_price(&node.text()))
        .unwrap_or_else(|| MISSING_PRICE.to_string());

    let condition = container
        .select_first(CONDITION_SELECTOR)
        .map(|node| node.text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_CONDITION.to_string());

    ItemRecord::new(title, condition, price, product_url.clone())
        .ok_or(ParseDegradation::MissingItemId { url: product_url })
}

/// Returns true when the page carries an enabled "next page" control
fn has_next_page<N: HtmlNode>(root: &N) -> bool {
    root.select_all(NEXT_PAGE_SELECTOR).iter().any(|node| {
        let has_href = node.attr("href").is_some_and(|href| !href.trim().is_empty());
        let disabled = node
            .attr("aria-disabled")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        has_href && !disabled
    })
}

/// Normalizes displayed price text to plain decimal text
///
/// A range keeps its lower bound (`"$10.00 to $20.00"` becomes `"10.00"`), and
/// currency symbols, thousands separators and labels are dropped.
///
/// Only dot-decimal prices survive intact: a comma is always read as a
/// thousands separator, so `"45,50 EUR"` becomes `"4550"`.
pub fn normalize_price(raw: &str) -> String {
    let low = raw.split(" to ").next().unwrap_or(raw);
    let digits: String = low
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        MISSING_PRICE.to_string()
    } else {
        digits
    }
}

/// Resolves a product href against the page URL
///
/// Only http(s) targets are accepted.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
