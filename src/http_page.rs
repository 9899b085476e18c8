//! Fetch-based page backend: plain HTTP requests plus CSS selector evaluation.
//!
//! No script runs, so it only sees server-rendered markup. Clicking follows the
//! first link on or inside the clicked element.

use crate::constants::default_headers;
use crate::error::{Error, Result};
use crate::models::Config;
use crate::page::{Locator, Page};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub struct HttpPage {
    client: Client,
    url: Option<Url>,
    body: Option<String>,
}

/// Owned snapshot of a matched element, so no parsed document outlives a call.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    tag: String,
    text: String,
    href: Option<String>,
    srcdoc: Option<String>,
}

impl HttpPage {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .cookie_store(true)
            .timeout(config.http_timeout)
            .default_headers(default_headers());

        if let Some(proxy) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            url: None,
            body: None,
        })
    }

    /// A page already showing `html` at `url`. Clicking links still fetches.
    pub fn from_html(url: &str, html: impl Into<String>) -> Result<Self> {
        let mut page = Self::new(&Config::default())?;
        page.url = Some(parse_url(url)?);
        page.body = Some(html.into());
        Ok(page)
    }

    fn resolve(&self, target: &str) -> Result<Url> {
        match &self.url {
            Some(base) => base
                .join(target)
                .map_err(|e| Error::Navigation(format!("{target}: {e}"))),
            None => parse_url(target),
        }
    }

    async fn fetch(&mut self, url: Url) -> Result<()> {
        debug!(url = %url, "fetching page");
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        let final_url = resp.url().clone();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Status { status, body });
        }
        self.url = Some(final_url);
        self.body = Some(body);
        Ok(())
    }

    fn first(&self, locator: &Locator) -> Result<Option<Element>> {
        match &self.body {
            Some(body) => find_first(body, locator),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        let url = self.resolve(url)?;
        self.fetch(url).await
    }

    async fn reload(&mut self) -> Result<()> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| Error::Navigation("reload before any navigation".into()))?;
        self.fetch(url).await
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        Ok(self.first(locator)?.is_some())
    }

    async fn text_content(&mut self, locator: &Locator) -> Result<Option<String>> {
        Ok(self.first(locator)?.map(|el| match el.srcdoc {
            Some(srcdoc) if el.tag == "iframe" => html_text(&srcdoc),
            _ => el.text,
        }))
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let element = self
            .first(locator)?
            .ok_or_else(|| Error::ElementNotFound(locator.to_string()))?;
        let href = element
            .href
            .ok_or_else(|| Error::ElementNotFound(format!("link inside {locator}")))?;
        let url = self.resolve(&href)?;
        self.fetch(url).await
    }

    fn url(&self) -> Option<&str> {
        self.url.as_ref().map(Url::as_str)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::Navigation(format!("{url}: {e}")))
}

fn find_first(body: &str, locator: &Locator) -> Result<Option<Element>> {
    let selector = Selector::parse(&locator.selector)
        .map_err(|e| Error::Selector(format!("{}: {e}", locator.selector)))?;
    let link = Selector::parse("a[href]").map_err(|e| Error::Selector(e.to_string()))?;
    let doc = Html::parse_document(body);

    let found = doc
        .select(&selector)
        .map(|el| (el, el.text().collect::<String>()))
        .find(|(_, text)| locator.text_matches(text))
        .map(|(el, text)| Element {
            tag: el.value().name().to_string(),
            text,
            href: element_href(el, &link),
            srcdoc: el.value().attr("srcdoc").map(str::to_string),
        });
    Ok(found)
}

fn element_href(el: ElementRef<'_>, link: &Selector) -> Option<String> {
    el.value()
        .attr("href")
        .or_else(|| el.select(link).next().and_then(|a| a.value().attr("href")))
        .map(str::to_string)
}

fn html_text(fragment: &str) -> String {
    Html::parse_document(fragment)
        .root_element()
        .text()
        .collect()
}
