use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use storefront_prices::catalog::Catalog;
use storefront_prices::env_boot::ensure_dotenv;
use storefront_prices::logging::{init_tracing, DEFAULT_FILTER};
use storefront_prices::orchestrator::{self, RunOptions};
use storefront_prices::providers::amazon::ReqwestTransport;
use storefront_prices::util::env::process_env;

#[derive(Parser, Debug)]
#[command(
    name = "storefront-prices",
    version,
    about = "Snapshot Amazon prices and discounts for the storefront catalog"
)]
struct Cli {
    /// Write the snapshot here instead of PRICES_OUTPUT_PATH / the default path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the snapshot to stdout and leave the output file untouched
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Skip loading a .env file
    #[arg(long, default_value_t = false)]
    no_dotenv: bool,
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv_file = if cli.no_dotenv { None } else { ensure_dotenv() };
    init_tracing(DEFAULT_FILTER, cli.verbose)?;
    if let Some(path) = &dotenv_file {
        info!(path = %path.display(), "storefront-prices: loaded .env");
    }

    let catalog = Catalog::builtin().context("invalid built-in catalog")?;
    let transport = ReqwestTransport::new(None).context("failed to build HTTP client")?;
    let opts = RunOptions {
        output: cli.output,
        dry_run: cli.dry_run,
    };

    match orchestrator::run_from_lookup(process_env, &catalog, &transport, &opts).await {
        Ok(summary) => {
            info!(
                priced = summary.priced,
                requested = summary.requested,
                missing = summary.missing.len(),
                "storefront-prices: done"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "storefront-prices: run failed");
            Err(e)
        }
    }
}
