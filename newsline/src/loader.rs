use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::error::FeedError;
use crate::timeline::{build_page, PageState, TimelineOptions};

/// Read and decode the feed document.
///
/// Every failure (missing file, unreadable file, malformed JSON) is folded into
/// `FeedError::DocumentUnavailable`; the reason keeps the underlying cause chain.
pub async fn load_document(path: &Path) -> std::result::Result<Value, FeedError> {
    match read_document(path).await {
        Ok(value) => {
            info!(path = %path.display(), "feed document loaded");
            Ok(value)
        }
        Err(e) => {
            let reason = format!("{e:#}");
            warn!(path = %path.display(), error = %reason, "feed document unavailable");
            Err(FeedError::DocumentUnavailable(reason))
        }
    }
}

async fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        anyhow::bail!("The file '{}' was not found", path.display());
    }
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    parse_document(&data).with_context(|| format!("Error decoding JSON from '{}'", path.display()))
}

/// Decode a feed document held in memory.
pub fn parse_document(data: &str) -> Result<Value> {
    let value = serde_json::from_str(data)?;
    Ok(value)
}

/// Load `path` and run the full pipeline over it: one snapshot, one page.
pub async fn load_page(path: &Path, options: &TimelineOptions) -> PageState {
    let document = load_document(path).await;
    build_page(document, options)
}
