//! Delivery of the aggregate to the backend.
//!
//! The whole aggregate goes out in one JSON POST. The response status is
//! reported back to the caller; it is not retried and never changes the
//! outcome of the run.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use crate::error::OutputError;
use crate::models::ArticleRecord;

/// Receives the aggregate of a run.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Send `records` downstream and return the response status.
    async fn deliver(&self, records: &[ArticleRecord]) -> Result<StatusCode, OutputError>;
}

/// Posts the aggregate to a fixed HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpDelivery {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDelivery {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Delivery for HttpDelivery {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint, count = records.len()))]
    async fn deliver(&self, records: &[ArticleRecord]) -> Result<StatusCode, OutputError> {
        let response = self.client.post(&self.endpoint).json(records).send().await?;
        let status = response.status();

        if status.is_success() {
            info!(%status, "Delivered articles");
        } else {
            warn!(%status, "Backend rejected articles");
        }
        Ok(status)
    }
}
