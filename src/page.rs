//! The page capabilities the inbox helper needs from a browser backend.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// "First element matching `selector` whose text contains `has_text`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub selector: String,
    pub has_text: Option<String>,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            has_text: None,
        }
    }

    pub fn with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            has_text: Some(text.into()),
        }
    }

    /// Whether an element's text satisfies the text filter: a case-insensitive
    /// substring match over whitespace-normalized text, like a browser's
    /// `:has-text()`.
    pub fn text_matches(&self, text: &str) -> bool {
        self.has_text.as_deref().map_or(true, |needle| {
            normalize(text)
                .to_lowercase()
                .contains(&normalize(needle).to_lowercase())
        })
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.has_text {
            Some(text) => write!(f, "{}:has-text({:?})", self.selector, text),
            None => f.write_str(&self.selector),
        }
    }
}

/// A single browsing context.
///
/// Navigation resolves once the page has settled. Any backend works: a real
/// browser driver, the fetch-based [`crate::HttpPage`], or a scripted double.
#[async_trait]
pub trait Page: Send {
    async fn goto(&mut self, url: &str) -> Result<()>;

    async fn reload(&mut self) -> Result<()>;

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool>;

    /// Text of the first matching element, `None` when nothing matches.
    async fn text_content(&mut self, locator: &Locator) -> Result<Option<String>>;

    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// Current URL, if the page has navigated anywhere.
    fn url(&self) -> Option<&str>;
}
