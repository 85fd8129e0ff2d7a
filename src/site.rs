//! The site contract and the scrape pipeline every site runs.
//!
//! A [`Site`] is a static identity (source name, category, index URL) plus a
//! set of extraction operations over parsed HTML. Sites never fetch pages
//! themselves: [`Site::run`] drives them through one pass:
//!
//! 1. Fetch the index page. Failure fails the site.
//! 2. Extract article locations from it. Failure fails the site.
//! 3. For each location, in page order, fetch the detail page and extract
//!    title, date, image and body. A fetch failure or a missing title/body
//!    drops only that article. A missing date or image just leaves the field
//!    empty.
//! 4. Return the articles that survived, in location order.
//!
//! Building an article with a blank required field is a defect in the site and
//! fails the whole site rather than being skipped.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{info, instrument, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::http::Fetcher;
use crate::models::{Article, Category};
use crate::utils::truncate_for_log;

/// Most article locations taken from one index page.
pub const DEFAULT_ARTICLE_LIMIT: usize = 20;

/// Longest error text logged for a skipped article.
const SKIP_REASON_LOG_LIMIT: usize = 300;

/// Static configuration of a site, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteIdentity {
    /// Name of the outlet, stored as each article's `source`.
    pub source: String,
    /// Category given to every article from this site.
    pub category: Category,
    /// The index page listing articles.
    pub url: String,
}

impl SiteIdentity {
    pub fn new(source: impl Into<String>, category: Category, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            category,
            url: url.into(),
        }
    }

    /// Like [`SiteIdentity::new`], but rejects a blank source or a non-absolute index URL.
    pub fn validated(
        source: impl Into<String>,
        category: Category,
        url: impl Into<String>,
    ) -> Result<Self, ScrapeError> {
        let identity = Self::new(source, category, url);
        if identity.source.trim().is_empty() {
            return Err(ScrapeError::construction("site has no source name"));
        }
        Url::parse(&identity.url).map_err(|e| {
            ScrapeError::construction(format!("index url '{}' is invalid: {e}", identity.url))
        })?;
        Ok(identity)
    }
}

impl fmt::Display for SiteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) <{}>", self.source, self.category, self.url)
    }
}

/// One news outlet section the scraper knows how to read.
///
/// Implementors provide the identity and the extraction operations; the
/// provided [`Site::run`] is the same for every site and should not be
/// overridden.
#[async_trait]
pub trait Site: Send + Sync {
    fn identity(&self) -> &SiteIdentity;

    /// Upper bound on article locations taken from the index page.
    fn article_limit(&self) -> usize {
        DEFAULT_ARTICLE_LIMIT
    }

    /// Article locations on the index page, in page order.
    ///
    /// Locations may be relative to the index URL. Non-article links (video
    /// pages and the like) should be left out.
    fn article_urls(&self, index: &Html) -> Result<Vec<String>, ScrapeError>;

    /// The article headline. Fails if none is present.
    fn title(&self, page: &Html) -> Result<String, ScrapeError>;

    /// When the article was published, if the page says and it parses.
    fn date(&self, page: &Html) -> Option<DateTime<FixedOffset>>;

    /// The lead image, if one can be found.
    fn image_url(&self, page: &Html) -> Option<String>;

    /// Body paragraphs in reading order. May be empty.
    fn body(&self, page: &Html) -> Result<Vec<String>, ScrapeError>;

    /// Scrape this site once.
    ///
    /// Up to `concurrency` detail pages are fetched at a time; articles are
    /// returned in location order whatever order the fetches finish in.
    async fn run(
        &self,
        fetcher: &dyn Fetcher,
        concurrency: usize,
    ) -> Result<Vec<Article>, ScrapeError> {
        run_pipeline(self, fetcher, concurrency).await
    }
}

#[instrument(
    level = "info",
    skip_all,
    fields(source = %site.identity().source, category = %site.identity().category)
)]
async fn run_pipeline<S: Site + ?Sized>(
    site: &S,
    fetcher: &dyn Fetcher,
    concurrency: usize,
) -> Result<Vec<Article>, ScrapeError> {
    let index_url = site.identity().url.as_str();
    let base = Url::parse(index_url).map_err(|e| ScrapeError::fetch(index_url, e))?;

    let markup = fetcher.fetch(index_url).await?;
    let locations = index_locations(site, &markup)?;
    info!(count = locations.len(), %index_url, "Indexed article locations");

    let mut results = stream::iter(locations)
        .map(|href| {
            let base = &base;
            async move {
                let result = scrape_article(site, fetcher, base, &href).await;
                (href, result)
            }
        })
        .buffered(concurrency.max(1));

    let mut articles = Vec::new();
    while let Some((href, result)) = results.next().await {
        match result {
            Ok(article) => articles.push(article),
            Err(e) if e.is_record_level() => {
                let error = truncate_for_log(&e.to_string(), SKIP_REASON_LOG_LIMIT);
                warn!(%href, %error, "Skipping article");
            }
            Err(e) => return Err(e),
        }
    }

    info!(count = articles.len(), "Scraped articles");
    Ok(articles)
}

fn index_locations<S: Site + ?Sized>(site: &S, markup: &str) -> Result<Vec<String>, ScrapeError> {
    let index = Html::parse_document(markup);
    let mut locations = site.article_urls(&index)?;
    locations.truncate(site.article_limit());
    Ok(locations)
}

async fn scrape_article<S: Site + ?Sized>(
    site: &S,
    fetcher: &dyn Fetcher,
    base: &Url,
    href: &str,
) -> Result<Article, ScrapeError> {
    let url = base
        .join(href)
        .map_err(|e| ScrapeError::extraction("article url", format!("'{href}': {e}")))?;
    let markup = fetcher.fetch(url.as_str()).await?;
    build_article(site, &url, &markup)
}

fn build_article<S: Site + ?Sized>(
    site: &S,
    url: &Url,
    markup: &str,
) -> Result<Article, ScrapeError> {
    let page = Html::parse_document(markup);

    let title = site.title(&page)?;
    let published_at = site.date(&page);
    let image_url = site
        .image_url(&page)
        .and_then(|src| url.join(&src).ok())
        .map(String::from);
    let body = site.body(&page)?;

    let identity = site.identity();
    Article::new(
        url.as_str(),
        title,
        image_url,
        body,
        identity.source.as_str(),
        identity.category,
        published_at,
    )
}
