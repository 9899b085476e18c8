//! Public data models and configuration.

use crate::constants::{
    default_http_timeout, default_poll_interval, default_settle_delay, default_timeout,
    MAILINATOR_INBOX_URL,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// A message observed in an inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    /// The subject fragment the message was looked up by.
    pub subject: String,
    /// Body text as rendered by the inbox view.
    pub content: String,
}

/// How `get_password_reset_link` spends its timeout across the two subject
/// fragments it tries ("reset", then "password").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetBudget {
    /// Each fragment gets the full timeout, so the worst case is twice the timeout.
    #[default]
    PerFragment,
    /// Both fragments draw from one deadline.
    Shared,
}

impl FromStr for ResetBudget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_fragment" => Ok(ResetBudget::PerFragment),
            "shared" => Ok(ResetBudget::Shared),
            other => Err(Error::Parse(format!("unknown reset budget: {other}"))),
        }
    }
}

/// Helper configuration. All timing values keep the defaults of the web flow
/// (30 s timeout, 2 s between polls, 2 s settle after opening a message).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public inbox listing URL; the inbox name is appended as `?zone=public&query=`.
    pub inbox_url: String,
    /// Pause between two inbox refreshes.
    #[serde(rename = "poll_interval_ms", deserialize_with = "millis")]
    pub poll_interval: Duration,
    /// Pause after opening a message before its body is read.
    #[serde(rename = "settle_delay_ms", deserialize_with = "millis")]
    pub settle_delay: Duration,
    /// Timeout used when a caller passes `None`.
    #[serde(rename = "timeout_ms", deserialize_with = "millis")]
    pub default_timeout: Duration,
    pub reset_budget: ResetBudget,
    /// Per-request timeout for the HTTP page backend.
    #[serde(rename = "http_timeout_ms", deserialize_with = "millis")]
    pub http_timeout: Duration,
    pub proxy_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inbox_url: MAILINATOR_INBOX_URL.to_string(),
            poll_interval: default_poll_interval(),
            settle_delay: default_settle_delay(),
            default_timeout: default_timeout(),
            reset_budget: ResetBudget::default(),
            http_timeout: default_http_timeout(),
            proxy_url: None,
        }
    }
}

fn millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| Error::Parse(format!("{key}: {e}")))
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults overlaid with `MAILINATOR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from a variable lookup (`MAILINATOR_INBOX_URL`,
    /// `MAILINATOR_POLL_INTERVAL_MS`, `MAILINATOR_SETTLE_DELAY_MS`,
    /// `MAILINATOR_TIMEOUT_MS`, `MAILINATOR_HTTP_TIMEOUT_MS`,
    /// `MAILINATOR_RESET_BUDGET`, `MAILINATOR_PROXY`).
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MAILINATOR_INBOX_URL") {
            self.inbox_url = url;
        }
        if let Some(v) = lookup("MAILINATOR_POLL_INTERVAL_MS") {
            self.poll_interval = parse_millis("MAILINATOR_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("MAILINATOR_SETTLE_DELAY_MS") {
            self.settle_delay = parse_millis("MAILINATOR_SETTLE_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("MAILINATOR_TIMEOUT_MS") {
            self.default_timeout = parse_millis("MAILINATOR_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("MAILINATOR_HTTP_TIMEOUT_MS") {
            self.http_timeout = parse_millis("MAILINATOR_HTTP_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("MAILINATOR_RESET_BUDGET") {
            self.reset_budget = v.parse()?;
        }
        if let Some(proxy) = lookup("MAILINATOR_PROXY") {
            self.proxy_url = Some(proxy).filter(|p| !p.trim().is_empty());
        }
        Ok(self)
    }

    /// Inbox listing URL for an inbox name.
    pub fn inbox_listing_url(&self, inbox: &str) -> String {
        format!("{}?zone=public&query={}", self.inbox_url, inbox)
    }
}
