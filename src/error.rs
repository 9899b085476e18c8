//! Error types for page backends and configuration loading.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for page and configuration operations.
///
/// The inbox helper never surfaces these to its callers; a failed lookup is
/// reported as "not found".
pub enum Error {
    /// Underlying HTTP client error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// IO error when reading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Navigation could not be performed (no current page, bad URL).
    #[error("navigation error: {0}")]
    Navigation(String),
    /// A selector string could not be parsed.
    #[error("invalid selector: {0}")]
    Selector(String),
    /// No element matched a locator that had to resolve.
    #[error("element not found: {0}")]
    ElementNotFound(String),
    /// Parse error with a message.
    #[error("parse error: {0}")]
    Parse(String),
    /// HTTP response returned a non-success status with body.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type for page and configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
