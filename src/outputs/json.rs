//! Debug artifact output.
//!
//! The aggregate of every run is written as a pretty-printed JSON array of
//! [`ArticleRecord`]s, replacing whatever the previous run left. Nothing in
//! the pipeline reads it back; it exists for offline inspection.

use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::error::OutputError;
use crate::models::ArticleRecord;
use crate::utils::ensure_parent_dir;

/// Write `records` to `path` as a JSON array, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_articles(records: &[ArticleRecord], path: &Path) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(records)?;

    ensure_parent_dir(path).await?;
    fs::write(path, json).await?;

    info!("Wrote articles file");
    Ok(())
}
