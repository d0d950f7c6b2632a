use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `-v` is given.
pub const DEFAULT_FILTER: &str = "info,storefront_prices=debug";

/// Filter directive for a `-v` count.
pub fn filter_for_verbosity(default_filter: &str, verbosity: u8) -> String {
    match verbosity {
        0 => default_filter.to_string(),
        1 => "debug".to_string(),
        _ => "debug,storefront_prices=trace".to_string(),
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `-v`, which wins
/// over `default_filter`.
///
/// Output goes to stderr so `--dry-run` JSON on stdout stays clean.
pub fn init_tracing(default_filter: &str, verbosity: u8) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(default_filter, verbosity)));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}
