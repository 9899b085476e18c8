pub mod address;
pub mod client;
pub mod constants;
pub mod error;
pub mod extract;
pub mod http_page;
pub mod models;
pub mod page;

pub use address::{generate_default_email, generate_email, inbox_name, MailboxAddress};
pub use client::{
    verify_invite_email_received, verify_password_reset_email_received, MailinatorHelper,
    MailinatorHelperBuilder,
};
pub use constants::{
    default_poll_interval, default_settle_delay, default_timeout, DEFAULT_TIMEOUT_MS,
    MAILINATOR_API_BASE, MAILINATOR_DOMAIN, MAILINATOR_INBOX_URL,
};
pub use error::{Error, Result};
pub use extract::{extract_password_creation_link, extract_password_reset_link, LinkPatterns};
pub use http_page::HttpPage;
pub use models::{Config, EmailMessage, ResetBudget};
pub use page::{Locator, Page};
