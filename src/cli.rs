//! Command-line interface definitions for the news scraper.
//!
//! Every option has a default, so a bare `news_scraper` performs a full run
//! against the built-in sites. Options can also be set through environment
//! variables.

use std::path::PathBuf;

use clap::Parser;
use reqwest::header::HeaderValue;

/// Scrape all registered news sites once and send the articles to the backend.
///
/// # Examples
///
/// ```sh
/// # Full run with defaults
/// news_scraper
///
/// # Write the articles file elsewhere and skip the backend
/// news_scraper -o /tmp/articles.json --no-deliver
///
/// # Leave out two sites and fetch four article pages at a time
/// news_scraper --exclude bbc_us --exclude cnn --detail-concurrency 4
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON file holding every scraped article (overwritten each run)
    #[arg(short, long, env = "SCRAPER_OUTPUT", default_value = "articles.json")]
    pub output: PathBuf,

    /// Backend endpoint receiving the articles as a JSON POST
    #[arg(
        long,
        env = "SCRAPER_ENDPOINT",
        default_value = "http://backend-rest:8080/api/articles"
    )]
    pub endpoint: String,

    /// Do not send articles to the backend
    #[arg(long)]
    pub no_deliver: bool,

    /// Site to leave out, by registry name or source name (repeatable)
    #[arg(long, value_name = "SITE")]
    pub exclude: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// User agent sent with every page request
    #[arg(
        long,
        default_value = concat!("news_scraper/", env!("CARGO_PKG_VERSION")),
        value_parser = parse_user_agent
    )]
    pub user_agent: String,

    /// Article pages fetched at once within a site (1 fetches them one at a time)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub detail_concurrency: u16,
}

/// Accept only values that can be sent as a `User-Agent` header.
fn parse_user_agent(value: &str) -> Result<String, String> {
    HeaderValue::from_str(value)
        .map(|_| value.to_string())
        .map_err(|e| format!("not a valid header value: {e}"))
}
