//! Scripted in-memory page shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mailinator_inbox_rs::constants::{
    DELETE_ALL_SELECTOR, DELETE_ALL_TEXT, MESSAGE_BODY_SELECTOR, MESSAGE_ROW_SELECTOR,
};
use mailinator_inbox_rs::{Error, Locator, Page, Result};

#[derive(Debug, Clone)]
pub struct ScriptedMessage {
    pub subject: String,
    pub body: String,
    /// Navigation (goto or reload) count from which the row is listed.
    pub arrives_on: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Blank,
    Inbox,
    Message(usize),
}

/// Inbox that fills up as the test navigates. Counts every call so tests can
/// assert on the traffic a helper produced.
#[derive(Debug)]
pub struct ScriptedPage {
    messages: Vec<ScriptedMessage>,
    view: View,
    url: Option<String>,
    pub navigations: usize,
    pub gotos: Vec<String>,
    pub reloads: usize,
    pub clicks: usize,
    pub fail_navigation: bool,
    pub fail_visibility: bool,
    pub has_delete_all: bool,
    pub cleared: bool,
}

impl ScriptedPage {
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            view: View::Blank,
            url: None,
            navigations: 0,
            gotos: Vec::new(),
            reloads: 0,
            clicks: 0,
            fail_navigation: false,
            fail_visibility: false,
            has_delete_all: false,
            cleared: false,
        }
    }

    /// A message listed from the first navigation on.
    pub fn with_message(subject: &str, body: &str) -> Self {
        Self::empty().message(subject, body, 1)
    }

    pub fn message(mut self, subject: &str, body: &str, arrives_on: usize) -> Self {
        self.messages.push(ScriptedMessage {
            subject: subject.to_string(),
            body: body.to_string(),
            arrives_on,
        });
        self
    }

    fn listed(&self) -> impl Iterator<Item = (usize, &ScriptedMessage)> + '_ {
        self.messages
            .iter()
            .enumerate()
            .filter(move |(_, m)| self.navigations >= m.arrives_on)
    }

    fn find_row(&self, locator: &Locator) -> Option<usize> {
        if self.view != View::Inbox || locator.selector != MESSAGE_ROW_SELECTOR {
            return None;
        }
        self.listed()
            .find(|(_, m)| locator.text_matches(&m.subject))
            .map(|(idx, _)| idx)
    }

    fn is_delete_all(&self, locator: &Locator) -> bool {
        self.view == View::Inbox
            && self.has_delete_all
            && locator.selector == DELETE_ALL_SELECTOR
            && locator.text_matches(DELETE_ALL_TEXT)
    }

    fn navigate(&mut self) -> Result<()> {
        if self.fail_navigation {
            return Err(Error::Navigation("scripted failure".into()));
        }
        self.navigations += 1;
        self.view = View::Inbox;
        Ok(())
    }
}

#[async_trait]
impl Page for ScriptedPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.gotos.push(url.to_string());
        self.navigate()?;
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        self.reloads += 1;
        self.navigate()
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        if self.fail_visibility {
            return Err(Error::ElementNotFound("scripted failure".into()));
        }
        Ok(self.find_row(locator).is_some() || self.is_delete_all(locator))
    }

    async fn text_content(&mut self, locator: &Locator) -> Result<Option<String>> {
        match self.view {
            View::Message(idx) if locator.selector == MESSAGE_BODY_SELECTOR => {
                Ok(Some(self.messages[idx].body.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        self.clicks += 1;
        if let Some(idx) = self.find_row(locator) {
            self.view = View::Message(idx);
            return Ok(());
        }
        if self.is_delete_all(locator) {
            self.messages.clear();
            self.cleared = true;
            return Ok(());
        }
        Err(Error::ElementNotFound(locator.to_string()))
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
