//! Page retrieval.
//!
//! Sites never talk to the network directly; the pipeline hands them markup
//! obtained through a [`Fetcher`]. Production runs use [`HttpFetcher`], tests
//! substitute an in-memory page table.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::ScrapeError;

/// Retrieves the markup of a page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return its body as text.
    ///
    /// Any transport failure or non-success status is a [`ScrapeError::Fetch`].
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given user agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(url, format!("status {status}")));
        }

        let body = response.text().await.map_err(|e| ScrapeError::fetch(url, e))?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
