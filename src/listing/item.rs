use crate::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// One product listing extracted from a storefront page
///
/// Only `title`, `condition`, `price` and `product_url` are serialized; the
/// item ID is carried in the record's file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Storefront item ID, taken from the `/itm/<digits>` part of the URL
    #[serde(skip)]
    pub item_id: String,

    /// Listing title
    pub title: String,

    /// Seller-declared condition label ("New", "Pre-Owned", ...)
    pub condition: String,

    /// Price as decimal text, never parsed into a number
    pub price: String,

    /// Absolute product URL
    pub product_url: String,
}

impl ItemRecord {
    /// Builds a record, deriving the item ID from `product_url`
    ///
    /// Returns `None` when the URL carries no recognisable item ID: such a
    /// listing is dropped rather than stored under a synthetic key.
    pub fn new(
        title: impl Into<String>,
        condition: impl Into<String>,
        price: impl Into<String>,
        product_url: impl Into<String>,
    ) -> Option<Self> {
        let product_url = product_url.into();
        let item_id = extract_item_id(&product_url)?;

        Some(Self {
            item_id,
            title: title.into(),
            condition: condition.into(),
            price: price.into(),
            product_url,
        })
    }
}

fn item_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/itm/(\d+)").expect("item id pattern is valid"))
}

/// Extracts the numeric item ID from a product URL
///
/// # Example
///
/// ```
/// use storefront_crawler::listing::extract_item_id;
///
/// let id = extract_item_id("https://www.ebay.com/itm/123456789012?hash=abc");
/// assert_eq!(id.as_deref(), Some("123456789012"));
/// assert_eq!(extract_item_id("https://www.ebay.com/str/shop"), None);
/// ```
pub fn extract_item_id(url: &str) -> Option<String> {
    item_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Condition values a crawl can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Condition {
    New,
    PreOwned,
    Used,
}

impl Condition {
    /// The storefront's label for this condition
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::PreOwned => "Pre-Owned",
            Self::Used => "Used",
        }
    }

    /// Returns all supported conditions
    pub fn all() -> [Self; 3] {
        [Self::New, Self::PreOwned, Self::Used]
    }
}

/// Accepts the display names in any ASCII case (`new`, `PRE-OWNED`)
impl FromStr for Condition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnsupportedCondition(s.to_string()))
    }
}

impl TryFrom<String> for Condition {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
