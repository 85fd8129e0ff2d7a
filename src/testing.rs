//! In-memory fakes for exercising the pipeline without a network.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::StatusCode;
use scraper::Html;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{OutputError, ScrapeError};
use crate::http::Fetcher;
use crate::models::{ArticleRecord, Category};
use crate::outputs::delivery::Delivery;
use crate::site::{Site, SiteIdentity};
use crate::utils::{element_text, parse_timestamp, selector};

/// Serves canned pages and records every URL requested, in request order.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` for `url`. URLs without a page fail with a fetch error.
    pub fn with_page(mut self, url: &str, markup: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), markup.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::fetch(url, "status 404 Not Found"))
    }
}

/// A site with plain, predictable markup:
///
/// - index: `<a class="story" href="...">`
/// - detail: `<h1>` title, `<time datetime>`, `<img class="lead">`, `<article><p>` body
#[derive(Debug)]
pub struct StaticSite {
    identity: SiteIdentity,
}

impl StaticSite {
    pub fn new(source: &str, category: Category, url: &str) -> Self {
        Self {
            identity: SiteIdentity::new(source, category, url),
        }
    }
}

impl Site for StaticSite {
    fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    fn article_urls(&self, index: &Html) -> Result<Vec<String>, ScrapeError> {
        let links = selector("a.story[href]")?;
        let urls: Vec<String> = index
            .select(&links)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            return Err(ScrapeError::extraction("article urls", "no story links"));
        }
        Ok(urls)
    }

    fn title(&self, page: &Html) -> Result<String, ScrapeError> {
        let h1 = selector("h1")?;
        page.select(&h1)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScrapeError::extraction("title", "no h1"))
    }

    fn date(&self, page: &Html) -> Option<DateTime<FixedOffset>> {
        let time = selector("time[datetime]").ok()?;
        page.select(&time)
            .next()
            .and_then(|el| el.value().attr("datetime"))
            .and_then(parse_timestamp)
    }

    fn image_url(&self, page: &Html) -> Option<String> {
        let img = selector("img.lead[src]").ok()?;
        page.select(&img)
            .next()
            .and_then(|el| el.value().attr("src"))
            .map(str::to_string)
    }

    fn body(&self, page: &Html) -> Result<Vec<String>, ScrapeError> {
        let article = selector("article")?;
        let paragraphs = selector("p")?;
        let container = page
            .select(&article)
            .next()
            .ok_or_else(|| ScrapeError::extraction("body", "no article element"))?;
        Ok(container.select(&paragraphs).map(|p| element_text(&p)).collect())
    }
}

/// A site whose index extraction panics.
#[derive(Debug)]
pub struct PanickingSite {
    identity: SiteIdentity,
}

impl PanickingSite {
    pub fn new(url: &str) -> Self {
        Self {
            identity: SiteIdentity::new("Panicky", Category::Other, url),
        }
    }
}

impl Site for PanickingSite {
    fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    fn article_urls(&self, _index: &Html) -> Result<Vec<String>, ScrapeError> {
        panic!("index markup drifted");
    }

    fn title(&self, _page: &Html) -> Result<String, ScrapeError> {
        Err(ScrapeError::extraction("title", "unreachable"))
    }

    fn date(&self, _page: &Html) -> Option<DateTime<FixedOffset>> {
        None
    }

    fn image_url(&self, _page: &Html) -> Option<String> {
        None
    }

    fn body(&self, _page: &Html) -> Result<Vec<String>, ScrapeError> {
        Ok(Vec::new())
    }
}

/// Index page linking to each of `hrefs`.
pub fn index_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a class="story" href="{href}">story</a></li>"#))
        .collect();
    format!("<html><body><ul>{links}</ul></body></html>")
}

/// Detail page with a title, a timestamp and two paragraphs.
pub fn detail_page(title: &str) -> String {
    format!(
        r#"<html><body>
            <h1>{title}</h1>
            <time datetime="2024-03-05T14:20:00Z">March 5</time>
            <img class="lead" src="/images/{title}.jpg">
            <article><p>First paragraph.</p><p>Second paragraph.</p></article>
        </body></html>"#
    )
}

/// Records every aggregate it is handed and answers with a fixed status.
#[derive(Debug)]
pub struct RecordingDelivery {
    status: StatusCode,
    received: Mutex<Vec<Vec<ArticleRecord>>>,
}

impl RecordingDelivery {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<Vec<ArticleRecord>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn deliver(&self, records: &[ArticleRecord]) -> Result<StatusCode, OutputError> {
        self.received.lock().unwrap().push(records.to_vec());
        Ok(self.status)
    }
}

/// Formatted log output collected from the current thread.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events into a fresh buffer until the guard drops.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines containing `needle`.
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
