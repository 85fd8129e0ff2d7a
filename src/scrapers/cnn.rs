//! CNN Lite site.
//!
//! [CNN Lite](https://lite.cnn.com) is the text-only edition of CNN. Its
//! markup is minimal and stable, and it carries no images, so articles from
//! this site never have an image URL.
//!
//! # URL Pattern
//!
//! Articles are linked from the homepage with relative URLs like
//! `/2025/05/06/politics/article-slug`, resolved against the homepage.

use chrono::{DateTime, FixedOffset};
use scraper::Html;

use crate::error::ScrapeError;
use crate::models::Category;
use crate::site::{Site, SiteIdentity};
use crate::utils::{collapse_whitespace, element_text, parse_timestamp, selector};

const INDEX_URL: &str = "https://lite.cnn.com";

/// CNN Lite homepage.
#[derive(Debug)]
pub struct CnnLite {
    identity: SiteIdentity,
}

impl CnnLite {
    /// Create the site.
    ///
    /// # Returns
    ///
    /// The site, or [`ScrapeError::Construction`] if its identity is invalid.
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            identity: SiteIdentity::validated("CNN", Category::UnitedStatesPolitics, INDEX_URL)?,
        })
    }

    /// Registry constructor.
    pub fn boxed() -> Result<Box<dyn Site>, ScrapeError> {
        Ok(Box::new(Self::new()?))
    }
}

impl Site for CnnLite {
    fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    fn article_urls(&self, index: &Html) -> Result<Vec<String>, ScrapeError> {
        let story = selector(".card--lite a[href]")?;
        let urls: Vec<String> = index
            .select(&story)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            return Err(ScrapeError::extraction("article urls", "no .card--lite links"));
        }
        Ok(urls)
    }

    fn title(&self, page: &Html) -> Result<String, ScrapeError> {
        let headline = selector(".headline--lite")?;
        page.select(&headline)
            .map(|el| element_text(&el))
            .find(|t| !t.is_empty())
            .ok_or_else(|| ScrapeError::extraction("title", "no .headline--lite"))
    }

    fn date(&self, page: &Html) -> Option<DateTime<FixedOffset>> {
        let timestamp = selector(".timestamp--lite").ok()?;
        let text = page.select(&timestamp).next().map(|el| element_text(&el))?;
        parse_byline_timestamp(&text)
    }

    fn image_url(&self, _page: &Html) -> Option<String> {
        None
    }

    fn body(&self, page: &Html) -> Result<Vec<String>, ScrapeError> {
        let article = selector(".article--lite")?;
        let paragraph = selector("p")?;
        let container = page
            .select(&article)
            .next()
            .ok_or_else(|| ScrapeError::extraction("body", "no .article--lite"))?;

        Ok(container
            .select(&paragraph)
            .map(|p| element_text(&p))
            .filter(|t| !t.is_empty())
            .collect())
    }
}

/// Parse a byline such as `Updated: 10:47 PM EDT, Tue March 5, 2024`.
fn parse_byline_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = collapse_whitespace(text);
    let text = text
        .split_once(':')
        .filter(|(label, _)| label.chars().all(char::is_alphabetic))
        .map_or(text.as_str(), |(_, rest)| rest.trim());

    let (time, date) = text.split_once(", ")?;
    // "10:47 PM EDT" -> "10:47 PM"
    let time = time.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    // "Tue March 5, 2024" -> "March 5, 2024"
    let date = match date.split_once(' ') {
        Some((weekday, rest)) if weekday.len() <= 3 => rest,
        _ => date,
    };
    parse_timestamp(&format!("{date}, {time}"))
}
