//! Helpers shared by the site implementations and the output writers.
//!
//! - Lenient timestamp parsing for the many date formats news sites publish
//! - Selector construction and class-pattern matching over parsed HTML
//! - Whitespace normalisation of extracted text
//! - String truncation for logging
//! - Directory preparation for the debug artifact

use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use scraper::{ElementRef, Selector};
use tokio::fs;
use tracing::{debug, instrument};

use crate::error::ScrapeError;

/// Date-time layouts tried, in order, after RFC 3339 and RFC 2822.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%B %d, %Y, %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y, %I:%M %p",
    "%b %d, %Y %I:%M %p",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

/// Parse a timestamp as published by a news site.
///
/// Accepts RFC 3339, RFC 2822 and a handful of human layouts such as
/// `March 5, 2024, 3:12 PM ET`. Layouts without an offset are read as local
/// time. Returns `None` for anything that cannot be parsed.
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(&text) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(&text) {
        return Some(ts);
    }

    let text = strip_zone_abbreviation(&text);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return localize(naive);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).and_then(localize);
        }
    }

    let text = truncate_for_log(text, 80);
    debug!(%text, "Unrecognised timestamp format");
    None
}

/// Convert epoch milliseconds (as a decimal string) to a local timestamp.
pub fn timestamp_from_epoch_millis(text: &str) -> Option<DateTime<FixedOffset>> {
    let millis: i64 = text.trim().parse().ok()?;
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local).fixed_offset())
}

fn localize(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.fixed_offset())
}

/// Drop a trailing zone abbreviation like `ET` or `EST`; chrono cannot parse those.
fn strip_zone_abbreviation(text: &str) -> &str {
    match text.rsplit_once(' ') {
        Some((head, tail))
            if (2..=4).contains(&tail.len())
                && tail.chars().all(|c| c.is_ascii_uppercase())
                && tail != "AM"
                && tail != "PM" =>
        {
            head
        }
        _ => text,
    }
}

/// Parse a CSS selector, reporting a bad one as an extraction failure.
pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::extraction("selector", format!("'{css}': {e}")))
}

/// Whether the element's class attribute, or any single class in it, matches `pattern`.
pub fn has_class_matching(element: &ElementRef<'_>, pattern: &Regex) -> bool {
    element.value().attr("class").is_some_and(|class| {
        pattern.is_match(class) || class.split_whitespace().any(|c| pattern.is_match(c))
    })
}

/// All text beneath `element`, whitespace-collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backing off to a char boundary) with
/// an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create the parent directory of `path` if it has one and it is missing.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
