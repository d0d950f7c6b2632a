use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::util::env::{env_opt, env_or, env_required, log_snapshot};

pub const ENV_ACCESS_KEY: &str = "PAAPI_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "PAAPI_SECRET_KEY";
pub const ENV_PARTNER_TAG: &str = "PAAPI_PARTNER_TAG";
pub const ENV_REGION: &str = "PAAPI_REGION";
pub const ENV_HOST: &str = "PAAPI_HOST";
pub const ENV_MARKETPLACE: &str = "PAAPI_MARKETPLACE";
pub const ENV_PARTNER_TYPE: &str = "PAAPI_PARTNER_TYPE";
pub const ENV_OUTPUT_PATH: &str = "PRICES_OUTPUT_PATH";

pub const DEFAULT_REGION: &str = "eu-west-1";
pub const DEFAULT_HOST: &str = "webservices.amazon.de";
pub const DEFAULT_MARKETPLACE: &str = "www.amazon.de";
pub const DEFAULT_PARTNER_TYPE: &str = "Associates";

/// Snapshot location relative to the crate root, where the storefront build
/// picks it up.
pub const DEFAULT_OUTPUT_RELATIVE: &str = "data/amazon-prices.json";

pub fn default_output_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_OUTPUT_RELATIVE)
}

/// API credentials. The secret never shows up in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Immutable run configuration, built once at program entry.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub partner_tag: String,
    pub partner_type: String,
    pub region: String,
    pub host: String,
    pub marketplace: String,
    pub output_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(crate::util::env::process_env)
    }

    /// Build configuration from an arbitrary key lookup. All missing required
    /// keys are reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let [access_key, secret_key, partner_tag] =
            env_required(&lookup, [ENV_ACCESS_KEY, ENV_SECRET_KEY, ENV_PARTNER_TAG])?;

        let output_path = env_opt(&lookup, ENV_OUTPUT_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_output_path);

        let cfg = Self {
            credentials: Credentials {
                access_key,
                secret_key,
            },
            partner_tag,
            partner_type: env_or(&lookup, ENV_PARTNER_TYPE, DEFAULT_PARTNER_TYPE),
            region: env_or(&lookup, ENV_REGION, DEFAULT_REGION),
            host: env_or(&lookup, ENV_HOST, DEFAULT_HOST),
            marketplace: env_or(&lookup, ENV_MARKETPLACE, DEFAULT_MARKETPLACE),
            output_path,
        };

        log_snapshot(
            "storefront-prices",
            &lookup,
            &[
                ENV_ACCESS_KEY,
                ENV_SECRET_KEY,
                ENV_PARTNER_TAG,
                ENV_REGION,
                ENV_HOST,
                ENV_MARKETPLACE,
                ENV_PARTNER_TYPE,
            ],
        );

        Ok(cfg)
    }

    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }
}
