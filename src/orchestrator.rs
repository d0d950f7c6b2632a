use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::normalization::price::{PriceMapper, PriceRecord};
use crate::providers::amazon::models::Item;
use crate::providers::amazon::provider::AmazonProvider;
use crate::providers::amazon::transport::HttpTransport;
use crate::snapshot::{write_snapshot, OutputDocument};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the configured output path.
    pub output: Option<PathBuf>,
    /// Print the document to stdout instead of writing it.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub requested: usize,
    pub fetched: usize,
    pub priced: usize,
    /// Product keys that ended up without a price.
    pub missing: Vec<String>,
    /// Where the snapshot went; `None` on a dry run.
    pub written_to: Option<PathBuf>,
}

/// Map fetched items onto catalog keys and build the document in catalog
/// order. Returns the keys left without a price alongside it.
pub fn assemble(
    cfg: &AppConfig,
    catalog: &Catalog,
    items: &[Item],
    generated_at: DateTime<Utc>,
) -> (OutputDocument, Vec<String>) {
    let mapper = PriceMapper::for_marketplace(&cfg.marketplace);
    let owners = catalog.reverse_index();

    let mut by_key: HashMap<&str, PriceRecord> = HashMap::with_capacity(items.len());
    for item in items {
        let Some(keys) = owners.get(item.asin.as_str()) else {
            debug!(asin = %item.asin, "run: item not in catalog, skipping");
            continue;
        };
        let Some(record) = mapper.map(item) else {
            continue;
        };
        for key in keys {
            by_key.insert(*key, record.clone());
        }
    }

    let mut prices = IndexMap::with_capacity(by_key.len());
    let mut missing = Vec::new();
    for (key, _) in catalog.iter() {
        match by_key.remove(key) {
            Some(record) => {
                prices.insert(key.to_string(), record);
            }
            None => missing.push(key.to_string()),
        }
    }

    (
        OutputDocument::new(generated_at, cfg.marketplace.clone(), prices),
        missing,
    )
}

/// Fetch, map and persist one snapshot. Nothing is written unless every
/// batch succeeded.
pub async fn run<T: HttpTransport>(
    cfg: &AppConfig,
    catalog: &Catalog,
    transport: &T,
    opts: &RunOptions,
) -> Result<RunSummary> {
    let ids = catalog.unique_ids();
    info!(
        products = catalog.len(),
        unique_ids = ids.len(),
        marketplace = %cfg.marketplace,
        "run: starting price fetch"
    );

    let provider = AmazonProvider::new(cfg, transport);
    let items = provider
        .fetch_all(&ids)
        .await
        .context("fetching prices from PA-API failed")?;

    let (doc, missing) = assemble(cfg, catalog, &items, Utc::now());
    if !missing.is_empty() {
        warn!(count = missing.len(), keys = ?missing, "run: products without a price");
    }

    let mut summary = RunSummary {
        requested: ids.len(),
        fetched: items.len(),
        priced: doc.prices.len(),
        missing,
        written_to: None,
    };

    if opts.dry_run {
        print!("{}", doc.render()?);
        info!(priced = summary.priced, "run: dry run, snapshot not written");
        return Ok(summary);
    }

    let path = opts.output.clone().unwrap_or_else(|| cfg.output_path.clone());
    write_snapshot(&path, &doc)
        .await
        .with_context(|| format!("writing snapshot to {}", path.display()))?;

    info!(
        requested = summary.requested,
        fetched = summary.fetched,
        priced = summary.priced,
        missing = summary.missing.len(),
        path = %path.display(),
        "run: snapshot written"
    );
    summary.written_to = Some(path);
    Ok(summary)
}

/// Build the configuration from `lookup`, then [`run`]. A configuration
/// error returns before the transport is touched.
pub async fn run_from_lookup<F, T>(
    lookup: F,
    catalog: &Catalog,
    transport: &T,
    opts: &RunOptions,
) -> Result<RunSummary>
where
    F: Fn(&str) -> Option<String>,
    T: HttpTransport,
{
    let cfg = AppConfig::from_lookup(lookup).context("invalid configuration")?;
    run(&cfg, catalog, transport, opts).await
}
