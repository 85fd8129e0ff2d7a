//! BBC News, US & Canada section.
//!
//! BBC markup uses generated styled-component classes (`sc-<hash>`), so
//! elements are matched on class prefixes rather than exact names.

use chrono::{DateTime, FixedOffset};
use regex::{Regex, RegexBuilder};
use scraper::Html;

use crate::error::ScrapeError;
use crate::models::Category;
use crate::site::{Site, SiteIdentity};
use crate::utils::{element_text, has_class_matching, parse_timestamp, selector};

const INDEX_URL: &str = "https://www.bbc.com/news/us-canada";
const ORIGIN: &str = "https://www.bbc.com";

const LINK_CLASS: &str = "sc-8a623a54-0 hMvGwj";
const PARAGRAPH_CLASS: &str = "^sc-9a00e533-0";
const GENERATED_CLASS: &str = "^sc-";

/// BBC News "US & Canada" section front.
#[derive(Debug)]
pub struct BbcUs {
    identity: SiteIdentity,
}

impl BbcUs {
    /// Create the site.
    ///
    /// # Returns
    ///
    /// The site, or [`ScrapeError::Construction`] if its identity is invalid.
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            identity: SiteIdentity::validated("BBC", Category::UnitedStatesPolitics, INDEX_URL)?,
        })
    }

    /// Registry constructor: [`BbcUs::new`] behind a `Box<dyn Site>`.
    pub fn boxed() -> Result<Box<dyn Site>, ScrapeError> {
        Ok(Box::new(Self::new()?))
    }
}

impl Site for BbcUs {
    fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    fn article_urls(&self, index: &Html) -> Result<Vec<String>, ScrapeError> {
        let news_link = selector(r#"[href^="/news/"]"#)?;
        let pattern = RegexBuilder::new(LINK_CLASS)
            .case_insensitive(true)
            .build()
            .map_err(|e| ScrapeError::extraction("article urls", e))?;

        let urls: Vec<String> = index
            .select(&news_link)
            .filter(|el| has_class_matching(el, &pattern))
            .filter_map(|el| el.value().attr("href"))
            .map(|path| format!("{ORIGIN}{path}"))
            .collect();

        if urls.is_empty() {
            return Err(ScrapeError::extraction("article urls", "no promo links"));
        }
        Ok(urls)
    }

    fn title(&self, page: &Html) -> Result<String, ScrapeError> {
        let h1 = selector("h1")?;
        let pattern = generated_class()?;
        page.select(&h1)
            .find(|el| has_class_matching(el, &pattern))
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScrapeError::extraction("title", "title tag not found"))
    }

    fn date(&self, page: &Html) -> Option<DateTime<FixedOffset>> {
        let time = selector("time[datetime]").ok()?;
        let pattern = generated_class().ok()?;
        page.select(&time)
            .find(|el| has_class_matching(el, &pattern))
            .and_then(|el| el.value().attr("datetime"))
            .and_then(parse_timestamp)
    }

    fn image_url(&self, page: &Html) -> Option<String> {
        let figure = selector("figure").ok()?;
        let img = selector("img[srcset][src]").ok()?;
        let src = page
            .select(&figure)
            .next()?
            .select(&img)
            .next()?
            .value()
            .attr("src")?;
        Some(src.replace(".webp", ""))
    }

    fn body(&self, page: &Html) -> Result<Vec<String>, ScrapeError> {
        let paragraph = selector("p")?;
        let pattern =
            Regex::new(PARAGRAPH_CLASS).map_err(|e| ScrapeError::extraction("body", e))?;

        Ok(page
            .select(&paragraph)
            .filter(|el| has_class_matching(el, &pattern))
            .map(|el| element_text(&el))
            .collect())
    }
}

fn generated_class() -> Result<Regex, ScrapeError> {
    Regex::new(GENERATED_CLASS).map_err(|e| ScrapeError::extraction("selector", e))
}
