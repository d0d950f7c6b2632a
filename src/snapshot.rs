use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::normalization::price::PriceRecord;

pub const SOURCE_TAG: &str = "amazon-paapi5";

/// The JSON document the storefront consumes. Replaced wholesale each run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDocument {
    pub generated_at: String,
    pub source: &'static str,
    pub marketplace: String,
    pub prices: IndexMap<String, PriceRecord>,
}

impl OutputDocument {
    pub fn new(
        generated_at: DateTime<Utc>,
        marketplace: impl Into<String>,
        prices: IndexMap<String, PriceRecord>,
    ) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: SOURCE_TAG,
            marketplace: marketplace.into(),
            prices,
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn render(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write the document next to its target and rename it into place, so readers
/// never observe a half-written file.
pub async fn write_snapshot(path: &Path, doc: &OutputDocument) -> Result<()> {
    let rendered = doc.render()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(path);
    tokio::fs::write(&staging, rendered.as_bytes()).await?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    debug!(path = %path.display(), bytes = rendered.len(), "snapshot: written");
    Ok(())
}
