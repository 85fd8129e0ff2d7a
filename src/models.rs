//! Data models for scraped articles.
//!
//! - [`Category`]: the closed set of tags an article can carry
//! - [`Article`]: one article extracted from a detail page
//! - [`ArticleRecord`]: the canonical serialized form sent downstream
//!
//! Field names of [`ArticleRecord`] are camelCase to match the JSON the
//! backend's `/api/articles` endpoint accepts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ScrapeError;

/// Categories an article can be sorted under.
///
/// The set is fixed at compile time. The wire value of each tag is its
/// SCREAMING_SNAKE_CASE name, as returned by [`Category::tag_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    UnitedStatesPolitics,
    WorldPolitics,
    Science,
    Technology,
    Sports,
    Entertainment,
    Business,
    Health,
    Education,
    Environment,
    Travel,
    Food,
    Lifestyle,
    Opinion,
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 15] = [
        Category::UnitedStatesPolitics,
        Category::WorldPolitics,
        Category::Science,
        Category::Technology,
        Category::Sports,
        Category::Entertainment,
        Category::Business,
        Category::Health,
        Category::Education,
        Category::Environment,
        Category::Travel,
        Category::Food,
        Category::Lifestyle,
        Category::Opinion,
        Category::Other,
    ];

    /// The stable wire representation of this tag.
    pub fn tag_value(self) -> &'static str {
        match self {
            Category::UnitedStatesPolitics => "UNITED_STATES_POLITICS",
            Category::WorldPolitics => "WORLD_POLITICS",
            Category::Science => "SCIENCE",
            Category::Technology => "TECHNOLOGY",
            Category::Sports => "SPORTS",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Business => "BUSINESS",
            Category::Health => "HEALTH",
            Category::Education => "EDUCATION",
            Category::Environment => "ENVIRONMENT",
            Category::Travel => "TRAVEL",
            Category::Food => "FOOD",
            Category::Lifestyle => "LIFESTYLE",
            Category::Opinion => "OPINION",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_value())
    }
}

impl FromStr for Category {
    type Err = ScrapeError;

    /// Parse a wire tag. Anything outside the fixed set is a construction error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.tag_value() == s)
            .ok_or_else(|| ScrapeError::construction(format!("unknown category '{s}'")))
    }
}

/// The canonical serialized form of an [`Article`].
///
/// This is exactly what lands in the debug artifact and in the delivery body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub article_url: String,
    pub image_url: Option<String>,
    pub title: String,
    pub body: Vec<String>,
    pub source: String,
    pub time_published: Option<String>,
    pub time_fetched: String,
    pub category: Category,
}

/// An article extracted from a single detail page.
///
/// Articles are immutable once built: fields are private and only exposed
/// through getters, so [`Article::to_record`] always yields the same record
/// for the same instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    url: String,
    title: String,
    image_url: Option<String>,
    body: Vec<String>,
    source: String,
    category: Category,
    published_at: Option<DateTime<FixedOffset>>,
    fetched_at: DateTime<FixedOffset>,
}

impl Article {
    /// Build an article, stamping it with the current local time as its fetch time.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Construction`] if `url`, `title` or `source` is
    /// blank, or if `url` is not an absolute URL.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        image_url: Option<String>,
        body: Vec<String>,
        source: impl Into<String>,
        category: Category,
        published_at: Option<DateTime<FixedOffset>>,
    ) -> Result<Self, ScrapeError> {
        Self::with_fetched_at(
            url,
            title,
            image_url,
            body,
            source,
            category,
            published_at,
            Local::now().fixed_offset(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn with_fetched_at(
        url: impl Into<String>,
        title: impl Into<String>,
        image_url: Option<String>,
        body: Vec<String>,
        source: impl Into<String>,
        category: Category,
        published_at: Option<DateTime<FixedOffset>>,
        fetched_at: DateTime<FixedOffset>,
    ) -> Result<Self, ScrapeError> {
        let url = url.into();
        let title = title.into();
        let source = source.into();

        if url.trim().is_empty() {
            return Err(ScrapeError::construction("article url is empty"));
        }
        if let Err(e) = Url::parse(&url) {
            return Err(ScrapeError::construction(format!(
                "article url '{url}' is not absolute: {e}"
            )));
        }
        if title.trim().is_empty() {
            return Err(ScrapeError::construction(format!("article {url} has an empty title")));
        }
        if source.trim().is_empty() {
            return Err(ScrapeError::construction(format!("article {url} has no source")));
        }

        Ok(Self {
            url,
            title,
            image_url,
            body,
            source,
            category,
            published_at,
            fetched_at,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.published_at
    }

    pub fn fetched_at(&self) -> DateTime<FixedOffset> {
        self.fetched_at
    }

    /// Produce the canonical record for this article.
    ///
    /// Pure function of the article's fields; repeated calls return equal records.
    pub fn to_record(&self) -> ArticleRecord {
        ArticleRecord {
            article_url: self.url.clone(),
            image_url: self.image_url.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
            source: self.source.clone(),
            time_published: self.published_at.map(render_timestamp),
            time_fetched: render_timestamp(self.fetched_at),
            category: self.category,
        }
    }
}

/// Render a timestamp as RFC 3339, with fractional seconds only when present.
pub fn render_timestamp(ts: DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
