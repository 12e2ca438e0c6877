//! Fetched page content.

use crate::html::extract_visible_text;

/// A fetched page, parsed once for classification.
///
/// Lives only as long as one candidate check; nothing retains it.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// URL the page was requested with
    pub url: String,

    /// Response body as received
    pub raw_html: Vec<u8>,

    /// Lower-cased visible text, whitespace collapsed
    pub visible_text: String,
}

impl PageContent {
    /// Build from a response body, extracting visible text.
    ///
    /// Bodies that are not valid UTF-8 are decoded lossily.
    pub fn new(url: impl Into<String>, raw_html: Vec<u8>) -> Self {
        let visible_text = extract_visible_text(&String::from_utf8_lossy(&raw_html));
        Self {
            url: url.into(),
            raw_html,
            visible_text,
        }
    }

    /// Body as text for link extraction.
    pub fn html(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.raw_html)
    }
}
