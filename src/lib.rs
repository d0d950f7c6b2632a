//! Fetches current prices and discounts for the storefront's product catalog
//! from the Amazon Product Advertising API and writes them to a JSON snapshot.
//!
//! Flow: [`config`] → [`providers::amazon`] (signed, batched `GetItems`) →
//! [`normalization::price`] → [`snapshot`], driven by [`orchestrator`].

pub mod catalog;
pub mod config;
pub mod env_boot;
pub mod error;
pub mod logging;
pub mod normalization;
pub mod orchestrator;
pub mod providers;
pub mod snapshot;

pub mod util {
    pub mod env;
}

pub use error::{ConfigError, PricesError, ProviderError};
