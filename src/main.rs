//! # News Scraper
//!
//! Scrapes a set of news sites, extracts one article per detail page, and
//! hands the combined articles to the news compiler backend.
//!
//! ## Usage
//!
//! ```sh
//! news_scraper -o ./articles.json --endpoint http://backend-rest:8080/api/articles
//! ```
//!
//! ## Architecture
//!
//! One batch pass per invocation:
//! 1. **Discovery**: the registry builds every registered, non-excluded site
//! 2. **Scraping**: each site fetches its index page, then its article pages
//! 3. **Aggregation**: surviving articles from all sites are concatenated
//! 4. **Output**: the aggregate is written to a JSON file and POSTed to the backend
//!
//! A broken article is skipped; a broken site is skipped. The run always
//! finishes with the aggregate written and delivery attempted.

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;
use news_scraper::http::HttpFetcher;
use news_scraper::orchestrator;
use news_scraper::outputs::delivery::{Delivery, HttpDelivery};
use news_scraper::registry::Registry;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let fetcher = HttpFetcher::new(&args.user_agent, Duration::from_secs(args.timeout_secs))?;
    let delivery = HttpDelivery::new(fetcher.client().clone(), args.endpoint.clone());
    let delivery: Option<&dyn Delivery> = if args.no_deliver { None } else { Some(&delivery) };

    // ---- Discover sites ----
    let registry = Registry::builtin();
    info!(registered = ?registry.names(), excluded = ?args.exclude, "Loading sites");
    let sites = registry.discover(&args.exclude);

    // ---- Scrape, write, deliver ----
    let summary = orchestrator::run_and_emit(
        &sites,
        &fetcher,
        usize::from(args.detail_concurrency),
        &args.output,
        delivery,
    )
    .await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        sites = sites.len(),
        articles = summary.records.len(),
        artifact_written = summary.artifact_written,
        delivery_status = ?summary.delivery_status,
        "Execution complete"
    );

    Ok(())
}
