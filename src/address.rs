//! Mailbox addresses and generated test identities.

use crate::constants::{DEFAULT_EMAIL_PREFIX, MAILINATOR_DOMAIN};
use crate::error::{Error, Result};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Inbox name of an address: everything before the first `@`.
/// An input without `@` is returned unchanged.
pub fn inbox_name(address: &str) -> &str {
    address.split_once('@').map_or(address, |(local, _)| local)
}

/// A `local@domain` mailbox address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxAddress(String);

impl MailboxAddress {
    pub fn parse(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        match address.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(address))
            }
            _ => Err(Error::Parse(format!("not a mailbox address: {address}"))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn inbox_name(&self) -> &str {
        inbox_name(&self.0)
    }
}

impl fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MailboxAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for MailboxAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a practically unique Mailinator address:
/// `<prefix><unix millis><0..=9999>@mailinator.com`.
pub fn generate_email(prefix: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let random: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{prefix}{timestamp}{random}@{MAILINATOR_DOMAIN}")
}

pub fn generate_default_email() -> String {
    generate_email(DEFAULT_EMAIL_PREFIX)
}
