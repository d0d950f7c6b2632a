use thiserror::Error;

/// Errors raised while building the run configuration. Always fatal and
/// always detected before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required env var(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid catalog entry {key:?}: {reason}")]
    InvalidCatalog { key: String, reason: &'static str },
}

/// Errors raised while talking to the advertising API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PricesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = PricesError> = std::result::Result<T, E>;
