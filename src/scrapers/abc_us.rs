//! ABC News, US section.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use scraper::Html;

use crate::error::ScrapeError;
use crate::models::Category;
use crate::site::{DEFAULT_ARTICLE_LIMIT, Site, SiteIdentity};
use crate::utils::{element_text, has_class_matching, parse_timestamp, selector};

const INDEX_URL: &str = "https://abcnews.go.com/US";

/// Obfuscated class list of the byline timestamp block.
const DATE_CLASS: &str = "jTKbV zIIsP ZdbeE xAPpq QtiLO JQYD";

/// The ABC News "US" section front.
#[derive(Debug)]
pub struct AbcUs {
    identity: SiteIdentity,
}

impl AbcUs {
    /// Create the site.
    ///
    /// # Returns
    ///
    /// The site, or [`ScrapeError::Construction`] if its identity is invalid.
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            identity: SiteIdentity::validated(
                "ABC News",
                Category::UnitedStatesPolitics,
                INDEX_URL,
            )?,
        })
    }

    /// Registry constructor.
    pub fn boxed() -> Result<Box<dyn Site>, ScrapeError> {
        Ok(Box::new(Self::new()?))
    }
}

impl Site for AbcUs {
    fn identity(&self) -> &SiteIdentity {
        &self.identity
    }

    /// Links from the first 20 content-roll items, minus video pages.
    fn article_urls(&self, index: &Html) -> Result<Vec<String>, ScrapeError> {
        let item = selector(".ContentRoll__Item")?;
        let anchor = selector("a.AnchorLink[href]")?;

        let items: Vec<_> = index.select(&item).take(DEFAULT_ARTICLE_LIMIT).collect();
        if items.is_empty() {
            return Err(ScrapeError::extraction("article urls", "no .ContentRoll__Item"));
        }

        let urls: Vec<String> = items
            .iter()
            .filter_map(|story| story.select(&anchor).next())
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| !href.contains("/video/"))
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            return Err(ScrapeError::extraction("article urls", "no non-video story links"));
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
        let div = selector("div").ok()?;
        let pattern = Regex::new(DATE_CLASS).ok()?;
        let text = page
            .select(&div)
            .find(|el| has_class_matching(el, &pattern))
            .map(|el| element_text(&el))?;
        parse_timestamp(&text)
    }

    fn image_url(&self, page: &Html) -> Option<String> {
        let article_body = selector(r#"[data-testid="prism-article-body"]"#).ok()?;
        let any = selector("*").ok()?;
        let img = selector("img[src]").ok()?;
        let pattern = Regex::new("InlineImage").ok()?;

        let body = page.select(&article_body).next()?;
        let inline = body.select(&any).find(|el| has_class_matching(el, &pattern))?;
        inline
            .select(&img)
            .next()
            .and_then(|el| el.value().attr("src"))
            .map(str::to_string)
    }

    /// Paragraphs of the article body, or of the whole page if the body block is missing.
    fn body(&self, page: &Html) -> Result<Vec<String>, ScrapeError> {
        let article_body = selector(r#"[data-testid="prism-article-body"]"#)?;
        let paragraph = selector("p")?;

        let paragraphs: Vec<String> = match page.select(&article_body).next() {
            Some(body) => body.select(&paragraph).map(|p| element_text(&p)).collect(),
            None => page.select(&paragraph).map(|p| element_text(&p)).collect(),
        };
        Ok(paragraphs.into_iter().filter(|t| !t.is_empty()).collect())
    }
}
