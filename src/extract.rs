//! Link extraction from message bodies.
//!
//! Each extractor is an ordered list of case-insensitive patterns. The first
//! pattern that matches anywhere in the body wins, and its leftmost match is
//! returned; later patterns are not consulted.

use once_cell::sync::Lazy;
use regex::Regex;

/// An ordered, first-match-wins list of URL patterns.
#[derive(Debug, Clone, Default)]
pub struct LinkPatterns {
    patterns: Vec<Regex>,
}

impl LinkPatterns {
    /// Compile patterns in priority order. Patterns are made case-insensitive.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(&format!("(?i){}", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Append a pattern with the lowest priority.
    pub fn push(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.patterns.push(Regex::new(&format!("(?i){pattern}"))?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn first_match<'a>(&self, content: &'a str) -> Option<&'a str> {
        self.patterns
            .iter()
            .find_map(|re| re.find(content))
            .map(|m| m.as_str())
    }

    /// Password creation links, as sent in invitation emails.
    pub fn creation() -> &'static LinkPatterns {
        &CREATION_PATTERNS
    }

    /// Password reset links.
    pub fn reset() -> &'static LinkPatterns {
        &RESET_PATTERNS
    }
}

const CREATION: &[&str] = &[
    r"https?://\S+/create-password\S*",
    r"https?://\S+/set-password\S*",
    r"https?://\S+/password\S*token=\S*",
    r"https?://\S+\?token=\S*",
];

const RESET: &[&str] = &[
    r"https?://\S+/reset-password\S*",
    r"https?://\S+/password-reset\S*",
    r"https?://\S+/forgot-password\S*token=\S*",
    r"https?://\S+/reset\S*token=\S*",
    r"https?://\S+\?token=\S*",
];

static CREATION_PATTERNS: Lazy<LinkPatterns> =
    Lazy::new(|| LinkPatterns::new(CREATION).expect("built-in creation patterns compile"));

static RESET_PATTERNS: Lazy<LinkPatterns> =
    Lazy::new(|| LinkPatterns::new(RESET).expect("built-in reset patterns compile"));

pub fn extract_password_creation_link(content: &str) -> Option<String> {
    LinkPatterns::creation().first_match(content).map(str::to_string)
}

pub fn extract_password_reset_link(content: &str) -> Option<String> {
    LinkPatterns::reset().first_match(content).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_link_stops_at_whitespace() {
        let body = "Click here: https://example.com/reset-password?token=abc123 to continue";
        assert_eq!(
            extract_password_reset_link(body).as_deref(),
            Some("https://example.com/reset-password?token=abc123")
        );
    }

    #[test]
    fn specific_pattern_beats_generic_token() {
        // The generic link comes first in the text but has lower priority.
        let body = "https://example.com/verify?token=zzz then \
                    https://example.com/reset-password/xyz";
        assert_eq!(
            extract_password_reset_link(body).as_deref(),
            Some("https://example.com/reset-password/xyz")
        );
    }

    #[test]
    fn reset_falls_through_priorities() {
        let body = "go to https://app.test/forgot-password/step?user=1&token=42 now";
        assert_eq!(
            extract_password_reset_link(body).as_deref(),
            Some("https://app.test/forgot-password/step?user=1&token=42")
        );
        let body = "https://app.test/account/reset?token=9";
        assert_eq!(
            extract_password_reset_link(body).as_deref(),
            Some("https://app.test/account/reset?token=9")
        );
        let body = "https://app.test/confirm?token=7";
        assert_eq!(
            extract_password_reset_link(body).as_deref(),
            Some("https://app.test/confirm?token=7")
        );
    }

    #[test]
    fn creation_links_in_priority_order() {
        let body = "Set one: https://app.test/set-password/abc \
                    or create: https://app.test/create-password/def";
        assert_eq!(
            extract_password_creation_link(body).as_deref(),
            Some("https://app.test/create-password/def")
        );
        let body = "Open https://app.test/password/new?token=t1 to start";
        assert_eq!(
            extract_password_creation_link(body).as_deref(),
            Some("https://app.test/password/new?token=t1")
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let body = "HTTPS://APP.TEST/RESET-PASSWORD/ABC";
        assert_eq!(extract_password_reset_link(body).as_deref(), Some(body));
    }

    #[test]
    fn absent_without_links() {
        assert_eq!(extract_password_reset_link("no links here"), None);
        assert_eq!(extract_password_creation_link(""), None);
        assert_eq!(
            extract_password_creation_link("see https://app.test/profile"),
            None
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let body = "x https://a.test/create-password?token=1 y";
        assert_eq!(
            extract_password_creation_link(body),
            extract_password_creation_link(body)
        );
    }

    #[test]
    fn custom_patterns_extend_without_control_flow_changes() {
        let mut patterns = LinkPatterns::new([r"https?://\S+/magic-link\S*"]).unwrap();
        patterns.push(r"https?://\S+/login\S*").unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(
            patterns.first_match("https://a.test/login and https://a.test/MAGIC-LINK/1"),
            Some("https://a.test/MAGIC-LINK/1")
        );
        assert!(LinkPatterns::new(["("]).is_err());
    }
}
