use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

pub const MAILINATOR_INBOX_URL: &str = "https://www.mailinator.com/v4/public/inboxes.jsp";
// REST API base; listed for completeness, the helper only drives the public web inbox.
pub const MAILINATOR_API_BASE: &str = "https://mailinator.com/api/v2";
pub const MAILINATOR_DOMAIN: &str = "mailinator.com";
pub const DEFAULT_EMAIL_PREFIX: &str = "test";

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Inbox listing rows, the opened message body and the bulk-delete control.
pub const MESSAGE_ROW_SELECTOR: &str = "tr";
pub const MESSAGE_BODY_SELECTOR: &str = ".message-body, .email-body, iframe";
pub const DELETE_ALL_SELECTOR: &str = "button, a";
pub const DELETE_ALL_TEXT: &str = "Delete All";

pub const RESET_SUBJECT: &str = "reset";
pub const PASSWORD_SUBJECT: &str = "password";
pub const INVITE_SUBJECT: &str = "invite";

pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("user-agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    ("accept-language", "en-US,en;q=0.5"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
];

pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (k, v) in DEFAULT_HEADERS {
        let name = HeaderName::from_static(k);
        if let Ok(val) = HeaderValue::from_str(v) {
            headers.insert(name, val);
        }
    }
    headers
}

pub fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS)
}

pub fn default_poll_interval() -> Duration {
    Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
}

pub fn default_settle_delay() -> Duration {
    Duration::from_millis(DEFAULT_SETTLE_DELAY_MS)
}

pub fn default_http_timeout() -> Duration {
    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
}
