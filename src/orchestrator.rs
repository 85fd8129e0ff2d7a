//! Drives every site and emits the aggregate.
//!
//! Sites are scraped one after another. Whatever goes wrong inside a site's
//! run (an error it returns, or a panic) is logged against that site and the
//! site contributes nothing; the next site runs regardless. The records that
//! survive are concatenated in site order, then article order, and handed to
//! the debug artifact writer and the delivery endpoint.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;
use reqwest::StatusCode;
use tracing::{debug, error, info, instrument};

use crate::error::ScrapeError;
use crate::http::Fetcher;
use crate::models::{Article, ArticleRecord};
use crate::outputs::delivery::Delivery;
use crate::outputs::json;
use crate::site::Site;

/// What a full run produced and how emission went.
#[derive(Debug)]
pub struct RunSummary {
    /// The aggregate, in site order then article order.
    pub records: Vec<ArticleRecord>,
    /// Whether the debug artifact was written.
    pub artifact_written: bool,
    /// The backend's response status, if delivery was attempted and got one.
    pub delivery_status: Option<StatusCode>,
}

/// Scrape every site and return the serialized records of those that succeeded.
#[instrument(level = "info", skip_all, fields(sites = sites.len()))]
pub async fn run_all(
    sites: &[Box<dyn Site>],
    fetcher: &dyn Fetcher,
    concurrency: usize,
) -> Vec<ArticleRecord> {
    let total = sites.len();
    let mut records = Vec::new();

    for (i, site) in sites.iter().enumerate() {
        let identity = site.identity();
        debug!(site = i + 1, total, %identity, "Downloading articles");

        match scrape_site(site.as_ref(), fetcher, concurrency).await {
            Ok(articles) => {
                info!(%identity, count = articles.len(), "Site scraped");
                records.extend(articles.iter().map(Article::to_record));
            }
            Err(e) => {
                error!(%identity, error = %e, "Site failed; skipping");
            }
        }
    }

    info!(count = records.len(), "Aggregated articles");
    records
}

/// Run one site, turning a panic into [`ScrapeError::Panicked`].
async fn scrape_site(
    site: &dyn Site,
    fetcher: &dyn Fetcher,
    concurrency: usize,
) -> Result<Vec<Article>, ScrapeError> {
    AssertUnwindSafe(site.run(fetcher, concurrency))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(ScrapeError::Panicked(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Scrape every site, write the debug artifact, then deliver the aggregate.
///
/// Emission failures are logged and reflected in the summary; they never
/// stop the other emission step. Delivery is skipped when `delivery` is `None`.
#[instrument(level = "info", skip_all, fields(artifact = %artifact.display()))]
pub async fn run_and_emit(
    sites: &[Box<dyn Site>],
    fetcher: &dyn Fetcher,
    concurrency: usize,
    artifact: &Path,
    delivery: Option<&dyn Delivery>,
) -> RunSummary {
    let records = run_all(sites, fetcher, concurrency).await;

    let artifact_written = match json::write_articles(&records, artifact).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Failed to write articles file");
            false
        }
    };

    let delivery_status = match delivery {
        Some(delivery) => match delivery.deliver(&records).await {
            Ok(status) => {
                info!(%status, count = records.len(), "Sent articles to backend");
                Some(status)
            }
            Err(e) => {
                error!(error = %e, "Failed to send articles to backend");
                None
            }
        },
        None => {
            info!("Delivery disabled");
            None
        }
    };

    RunSummary {
        records,
        artifact_written,
        delivery_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::testing::{
        CapturedLogs, FakeFetcher, PanickingSite, RecordingDelivery, StaticSite, detail_page,
        index_page,
    };

    const SCIENCE: &str = "https://science.example.com/latest";
    const WORLD: &str = "https://world.example.com/latest";
    const PANICKY: &str = "https://panicky.example.com/";

    fn science_fetcher() -> FakeFetcher {
        FakeFetcher::new()
            .with_page(SCIENCE, index_page(&["/one", "/two"]))
            .with_page("https://science.example.com/one", detail_page("One"))
            .with_page("https://science.example.com/two", detail_page("Two"))
    }

    fn sites() -> Vec<Box<dyn Site>> {
        vec![
            Box::new(StaticSite::new("Science Daily", Category::Science, SCIENCE)),
            Box::new(StaticSite::new("World Wire", Category::WorldPolitics, WORLD)),
        ]
    }

    #[tokio::test]
    async fn test_failed_site_contributes_nothing() {
        let fetcher = science_fetcher();

        let records = run_all(&sites(), &fetcher, 1).await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert!(records.iter().all(|r| r.category == Category::Science));
        assert!(fetcher.requests().contains(&WORLD.to_string()));
    }

    #[tokio::test]
    async fn test_failed_sites_are_logged_by_identity() {
        let (logs, _guard) = CapturedLogs::install();
        let fetcher = science_fetcher().with_page(PANICKY, index_page(&["/a"]));
        let mut sites = sites();
        sites.push(Box::new(PanickingSite::new(PANICKY)));

        run_all(&sites, &fetcher, 1).await;

        let failures = logs.lines_with("Site failed; skipping");
        assert_eq!(failures.len(), 2, "{}", logs.contents());
        assert!(failures[0].contains("ERROR"));
        assert!(failures[0].contains("World Wire"));
        assert!(failures[0].contains("failed to fetch https://world.example.com/latest"));
        assert!(failures[1].contains("Panicky"));
        assert!(failures[1].contains("index markup drifted"));
        assert_eq!(logs.lines_with("Site scraped").len(), 1);
    }

    #[tokio::test]
    async fn test_records_ordered_by_site_then_article() {
        let fetcher = science_fetcher()
            .with_page(WORLD, index_page(&["/x"]))
            .with_page("https://world.example.com/x", detail_page("X"));

        let records = run_all(&sites(), &fetcher, 1).await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "X"]);
        assert_eq!(records[2].source, "World Wire");
    }

    #[tokio::test]
    async fn test_panicking_site_is_isolated() {
        let fetcher = science_fetcher().with_page(PANICKY, index_page(&["/a"]));
        let sites: Vec<Box<dyn Site>> = vec![
            Box::new(PanickingSite::new(PANICKY)),
            Box::new(StaticSite::new("Science Daily", Category::Science, SCIENCE)),
        ];

        let records = run_all(&sites, &fetcher, 1).await;

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_scrape_site_reports_panic() {
        let fetcher = FakeFetcher::new().with_page(PANICKY, index_page(&["/a"]));
        let site = PanickingSite::new(PANICKY);

        let result = scrape_site(&site, &fetcher, 1).await;

        match result {
            Err(ScrapeError::Panicked(message)) => assert_eq!(message, "index markup drifted"),
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_emission() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("articles.json");
        let fetcher = science_fetcher();
        let delivery = RecordingDelivery::new(StatusCode::OK);

        let summary = run_and_emit(&sites(), &fetcher, 1, &artifact, Some(&delivery)).await;

        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.records[0].title, "One");
        assert_eq!(summary.records[1].title, "Two");
        assert!(summary.artifact_written);
        assert_eq!(summary.delivery_status, Some(StatusCode::OK));

        let written: Vec<ArticleRecord> =
            serde_json::from_str(&std::fs::read_to_string(&artifact).unwrap()).unwrap();
        assert_eq!(written, summary.records);
        assert_eq!(delivery.received(), vec![summary.records.clone()]);
    }

    #[tokio::test]
    async fn test_all_sites_failing_still_emits() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("articles.json");
        let fetcher = FakeFetcher::new();
        let delivery = RecordingDelivery::new(StatusCode::BAD_REQUEST);

        let summary = run_and_emit(&sites(), &fetcher, 1, &artifact, Some(&delivery)).await;

        assert!(summary.records.is_empty());
        assert!(summary.artifact_written);
        assert_eq!(summary.delivery_status, Some(StatusCode::BAD_REQUEST));
        assert_eq!(delivery.received(), vec![Vec::<ArticleRecord>::new()]);
    }

    #[tokio::test]
    async fn test_artifact_failure_does_not_block_delivery() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should go
        let artifact = dir.path().to_path_buf();
        let fetcher = science_fetcher();
        let delivery = RecordingDelivery::new(StatusCode::OK);

        let summary = run_and_emit(&sites(), &fetcher, 1, &artifact, Some(&delivery)).await;

        assert!(!summary.artifact_written);
        assert_eq!(delivery.received().len(), 1);
        assert_eq!(delivery.received()[0].len(), 2);
    }

    #[tokio::test]
    async fn test_delivery_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("articles.json");
        let fetcher = science_fetcher();

        let summary = run_and_emit(&sites(), &fetcher, 1, &artifact, None).await;

        assert_eq!(summary.records.len(), 2);
        assert!(summary.delivery_status.is_none());
    }
}
