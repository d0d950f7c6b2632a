//! Amazon Product Advertising API 5.0 client.
//!
//! - `signer`: AWS SigV4 `Authorization` header for one request
//! - `models`: `GetItems` request/response wire types
//! - `transport`: HTTP seam (reqwest in production)
//! - `provider`: batched, sequential `GetItems` fetching

pub mod models;
pub mod provider;
pub mod signer;
pub mod transport;

pub use provider::{AmazonProvider, BATCH_SIZE};
pub use transport::{HttpTransport, ReqwestTransport};
