//! Minimal tree-node interface the listing parser is written against
//!
//! The parser only needs to query by CSS selector, read text and read
//! attributes. Keeping those three capabilities behind `HtmlNode` leaves the
//! extraction rules independent of the HTML library in use.

use scraper::{ElementRef, Selector};

/// A node of a parsed HTML document
pub trait HtmlNode: Sized {
    /// All descendants matching `css`, in document order
    ///
    /// An invalid selector matches nothing.
    fn select_all(&self, css: &str) -> Vec<Self>;

    /// The first descendant matching `css`
    fn select_first(&self, css: &str) -> Option<Self> {
        self.select_all(css).into_iter().next()
    }

    /// Text content with runs of whitespace collapsed and the ends trimmed
    fn text(&self) -> String;

    /// Value of the attribute `name`, if present
    fn attr(&self, name: &str) -> Option<String>;
}

impl<'a> HtmlNode for ElementRef<'a> {
    fn select_all(&self, css: &str) -> Vec<Self> {
        match Selector::parse(css) {
            Ok(selector) => self.select(&selector).collect(),
            Err(e) => {
                tracing::warn!("Invalid selector '{}': {:?}", css, e);
                Vec::new()
            }
        }
    }

    fn text(&self) -> String {
        let raw: String = ElementRef::text(self).collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}
