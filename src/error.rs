//! Error types for scraping and output.
//!
//! [`ScrapeError`] is the failure taxonomy of a scrape pass. Where an error is
//! absorbed depends on where it is raised:
//!
//! - `Fetch` / `Extraction` on a detail page drop that one article.
//! - `Fetch` / `Extraction` on the index page, any `Construction` error, and a
//!   panic inside a site fail the whole site for this pass.
//!
//! [`OutputError`] covers writing the debug artifact and delivering the
//! aggregate. Neither ever aborts a run.

use std::fmt;

use thiserror::Error;

/// Failure raised while scraping a site.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// A page could not be retrieved (network, non-success status, unreadable body).
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// A required field was not found in otherwise valid markup.
    #[error("could not extract {field}: {message}")]
    Extraction { field: &'static str, message: String },

    /// An article was built with a missing required field or an unknown category.
    #[error("invalid article: {0}")]
    Construction(String),

    /// A site implementation panicked mid-run.
    #[error("site panicked: {0}")]
    Panicked(String),
}

impl ScrapeError {
    /// Create a fetch error for `url`.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction error for `field`.
    pub fn extraction(field: &'static str, message: impl fmt::Display) -> Self {
        Self::Extraction {
            field,
            message: message.to_string(),
        }
    }

    /// Create a construction error.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Whether this error only invalidates the article being built.
    ///
    /// Construction errors are defects in the site implementation and are
    /// never absorbed at article level.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Extraction { .. })
    }
}

/// Failure raised while emitting the aggregate.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_level_classification() {
        assert!(ScrapeError::fetch("https://example.com", "timeout").is_record_level());
        assert!(ScrapeError::extraction("title", "no h1").is_record_level());
        assert!(!ScrapeError::construction("empty title").is_record_level());
        assert!(!ScrapeError::Panicked("boom".into()).is_record_level());
    }

    #[test]
    fn test_display_includes_context() {
        let e = ScrapeError::fetch("https://example.com/a", "status 503");
        assert_eq!(e.to_string(), "failed to fetch https://example.com/a: status 503");

        let e = ScrapeError::extraction("body", "no paragraphs");
        assert_eq!(e.to_string(), "could not extract body: no paragraphs");
    }
}
