//! Associated Press, US news hub.
//!
//! AP renders publication time as epoch milliseconds on a `bsp-timestamp`
//! element, and lazy-loads lead images in carousels, so the image URL may have
//! to be dug out of a `srcset`-style attribute.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::error::ScrapeError;
use crate::models::Category;
use crate::site::{DEFAULT_ARTICLE_LIMIT, Site, SiteIdentity};
use crate::utils::{element_text, has_class_matching, selector, timestamp_from_epoch_millis};

const INDEX_URL: &str = "https://apnews.com/hub/us-news";

/// The AP "U.S. News" hub page.
#[derive(Debug)]
pub struct ApUs {
    identity: SiteIdentity,
}

impl ApUs {
    /// Create the site.
    ///
    /// # Returns
    ///
    /// The site, or [`ScrapeError::Construction`] if its identity is invalid.
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            identity: SiteIdentity::validated(
                "Associated Press (AP)",
                Category::UnitedStatesPolitics,
                INDEX_URL,
            )?,
        })
    }

    /// Registry constructor: [`ApUs::new`] behind a `Box<dyn Site>`.
    pub fn boxed() -> Result<Box<dyn Site>, ScrapeError> {
        Ok(Box::new(Self::new()?))
    }
}

impl Site for ApUs {
    fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    fn article_urls(&self, index: &Html) -> Result<Vec<String>, ScrapeError> {
        let content = selector("div.Page-content")?;
        let item = selector(".PageList-items-item")?;
        let anchor = selector("a[href]")?;

        let content = index
            .select(&content)
            .next()
            .ok_or_else(|| ScrapeError::extraction("article urls", "no div.Page-content"))?;

        let urls: Vec<String> = content
            .select(&item)
            .take(DEFAULT_ARTICLE_LIMIT)
            .filter_map(|story| story.select(&anchor).next())
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            return Err(ScrapeError::extraction("article urls", "no .PageList-items-item links"));
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
        let timestamp = selector("bsp-timestamp[data-timestamp]").ok()?;
        page.select(&timestamp)
            .next()
            .and_then(|el| el.value().attr("data-timestamp"))
            .and_then(timestamp_from_epoch_millis)
    }

    fn image_url(&self, page: &Html) -> Option<String> {
        let div = selector("div").ok()?;
        let pattern = Regex::new("Page-lead").ok()?;
        let lead = page.select(&div).find(|el| has_class_matching(el, &pattern))?;

        let img = selector("img[src]").ok()?;
        let src = lead.select(&img).next().and_then(|el| el.value().attr("src"));
        let image_url = match src {
            Some(src) if src.contains("https") => src.to_string(),
            _ => carousel_image(&lead)?,
        };

        image_url.contains("http").then_some(image_url)
    }

    fn body(&self, page: &Html) -> Result<Vec<String>, ScrapeError> {
        let any = selector("*")?;
        let paragraph = selector("p")?;
        let pattern = Regex::new("RichTextBody")
            .map_err(|e| ScrapeError::extraction("body", e))?;

        let rich_text = page
            .select(&any)
            .find(|el| has_class_matching(el, &pattern))
            .ok_or_else(|| ScrapeError::extraction("body", "no RichTextBody"))?;

        Ok(rich_text.select(&paragraph).map(|p| element_text(&p)).collect())
    }
}

/// First candidate of the lazy-load srcset in the lead carousel.
fn carousel_image(lead: &ElementRef<'_>) -> Option<String> {
    let source = selector("div.CarouselSlide-media source[data-flickity-lazyload-srcset]").ok()?;
    let srcset = lead
        .select(&source)
        .next()?
        .value()
        .attr("data-flickity-lazyload-srcset")?;
    srcset.split_whitespace().next().map(str::to_string)
}
