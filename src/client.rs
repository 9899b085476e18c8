use crate::address::inbox_name;
use crate::constants::*;
use crate::extract::{extract_password_creation_link, extract_password_reset_link};
use crate::models::{Config, EmailMessage, ResetBudget};
use crate::page::{Locator, Page};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Watches public Mailinator inboxes through a single [`Page`]. Lookups never
/// fail: anything missing or broken is reported as `false`/`None`.
pub struct MailinatorHelper<P> {
    page: P,
    config: Config,
}

#[derive(Debug, Clone, Default)]
pub struct MailinatorHelperBuilder {
    config: Config,
}

impl MailinatorHelperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn inbox_url(mut self, url: impl Into<String>) -> Self {
        self.config.inbox_url = url.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    pub fn reset_budget(mut self, budget: ResetBudget) -> Self {
        self.config.reset_budget = budget;
        self
    }

    pub fn build<P: Page>(self, page: P) -> MailinatorHelper<P> {
        MailinatorHelper::with_config(page, self.config)
    }
}

impl<P: Page> MailinatorHelper<P> {
    pub fn new(page: P) -> Self {
        Self::with_config(page, Config::default())
    }

    pub fn with_config(page: P, config: Config) -> Self {
        Self { page, config }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub async fn open_inbox(&mut self, address: &str) -> crate::Result<()> {
        let url = self.config.inbox_listing_url(inbox_name(address));
        debug!(url = %url, "opening inbox");
        self.page.goto(&url).await
    }

    /// Check, and after each miss sleep one poll interval; give up once
    /// `timeout` has elapsed. The first check always happens.
    pub async fn wait_for_email(
        &mut self,
        address: &str,
        subject: &str,
        timeout: Option<Duration>,
    ) -> bool {
        let timeout = timeout.unwrap_or(self.config.default_timeout);
        self.poll_inbox(address, subject, Instant::now(), timeout)
            .await
    }

    async fn poll_inbox(
        &mut self,
        address: &str,
        subject: &str,
        start: Instant,
        timeout: Duration,
    ) -> bool {
        let inbox = inbox_name(address);
        let row = Locator::with_text(MESSAGE_ROW_SELECTOR, subject);
        let mut opened = false;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let refreshed = if opened {
                self.page.reload().await
            } else {
                self.open_inbox(address).await
            };

            match refreshed {
                Ok(()) => {
                    opened = true;
                    debug!(inbox, subject, attempt, "checking inbox");
                    if self.visible(&row).await {
                        info!(inbox, subject, attempt, "email found");
                        return true;
                    }
                }
                Err(err) => warn!(inbox, attempt, error = %err, "inbox refresh failed"),
            }

            sleep(self.config.poll_interval).await;
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                info!(
                    inbox,
                    subject,
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "email not found before timeout"
                );
                return false;
            }
        }
    }

    /// Single attempt, no polling.
    pub async fn get_latest_email(&mut self, address: &str, subject: &str) -> Option<EmailMessage> {
        let inbox = inbox_name(address);
        if let Err(err) = self.open_inbox(address).await {
            warn!(inbox, error = %err, "could not open inbox");
            return None;
        }

        let row = Locator::with_text(MESSAGE_ROW_SELECTOR, subject);
        if !self.visible(&row).await {
            debug!(inbox, subject, "no matching message");
            return None;
        }

        if let Err(err) = self.page.click(&row).await {
            warn!(inbox, subject, error = %err, "could not open message");
            return None;
        }
        sleep(self.config.settle_delay).await;

        let body = Locator::new(MESSAGE_BODY_SELECTOR);
        match self.page.text_content(&body).await {
            Ok(Some(content)) => Some(EmailMessage {
                subject: subject.to_string(),
                content,
            }),
            Ok(None) => {
                debug!(inbox, subject, "message body not found");
                None
            }
            Err(err) => {
                warn!(inbox, subject, error = %err, "could not read message body");
                None
            }
        }
    }

    /// With [`ResetBudget::PerFragment`] this can take up to twice `timeout`.
    pub async fn get_password_reset_link(
        &mut self,
        address: &str,
        timeout: Option<Duration>,
    ) -> Option<String> {
        info!(email = address, "checking for password reset email");
        let timeout = timeout.unwrap_or(self.config.default_timeout);

        let found = match self.config.reset_budget {
            ResetBudget::PerFragment => {
                self.wait_for_email(address, RESET_SUBJECT, Some(timeout)).await
                    || self.wait_for_email(address, PASSWORD_SUBJECT, Some(timeout)).await
            }
            ResetBudget::Shared => {
                let start = Instant::now();
                self.poll_inbox(address, RESET_SUBJECT, start, timeout).await
                    || self.poll_inbox(address, PASSWORD_SUBJECT, start, timeout).await
            }
        };
        if !found {
            info!(email = address, "password reset email not found");
            return None;
        }

        let message = match self.get_latest_email(address, RESET_SUBJECT).await {
            Some(message) => message,
            None => match self.get_latest_email(address, PASSWORD_SUBJECT).await {
                Some(message) => message,
                None => {
                    warn!(email = address, "could not retrieve reset email content");
                    return None;
                }
            },
        };

        let link = extract_password_reset_link(&message.content);
        match &link {
            Some(link) => info!(email = address, link = %link, "password reset link found"),
            None => info!(email = address, "password reset link not found in email"),
        }
        link
    }

    pub async fn verify_invite_email(
        &mut self,
        address: &str,
        user_name: &str,
        timeout: Option<Duration>,
    ) -> bool {
        info!(email = address, "checking inbox for invite email");

        if !self.wait_for_email(address, INVITE_SUBJECT, timeout).await {
            info!(email = address, "invite email not found");
            return false;
        }

        let Some(message) = self.get_latest_email(address, INVITE_SUBJECT).await else {
            warn!(email = address, "could not retrieve invite email content");
            return false;
        };

        let contains_name = message.content.contains(user_name);
        info!(email = address, user_name, contains_name, "checked invite email for user name");

        // Diagnostic only.
        match extract_password_creation_link(&message.content) {
            Some(link) => info!(email = address, link = %link, "password creation link found"),
            None => warn!(email = address, "password creation link not found in invite email"),
        }

        contains_name
    }

    pub async fn verify_password_reset_email(
        &mut self,
        address: &str,
        timeout: Option<Duration>,
    ) -> bool {
        info!(email = address, "verifying password reset email");
        self.get_password_reset_link(address, timeout).await.is_some()
    }

    // Public inboxes expire on their own; a missing "Delete All" is fine.
    pub async fn clear_inbox(&mut self, address: &str) -> bool {
        if let Err(err) = self.open_inbox(address).await {
            warn!(email = address, error = %err, "could not open inbox");
            return false;
        }

        let button = Locator::with_text(DELETE_ALL_SELECTOR, DELETE_ALL_TEXT);
        if !self.visible(&button).await {
            warn!(email = address, "delete all control not found, inbox will auto-expire");
            return false;
        }

        match self.page.click(&button).await {
            Ok(()) => {
                info!(email = address, "cleared inbox");
                true
            }
            Err(err) => {
                warn!(email = address, error = %err, "could not clear inbox");
                false
            }
        }
    }

    async fn visible(&mut self, locator: &Locator) -> bool {
        self.page.is_visible(locator).await.unwrap_or_else(|err| {
            debug!(locator = %locator, error = %err, "visibility check failed");
            false
        })
    }
}

pub async fn verify_invite_email_received<P: Page>(
    page: P,
    address: &str,
    user_name: &str,
    timeout: Option<Duration>,
) -> bool {
    let mut helper = MailinatorHelper::new(page);
    helper.verify_invite_email(address, user_name, timeout).await
}

pub async fn verify_password_reset_email_received<P: Page>(
    page: P,
    address: &str,
    timeout: Option<Duration>,
) -> bool {
    let mut helper = MailinatorHelper::new(page);
    helper.verify_password_reset_email(address, timeout).await
}
