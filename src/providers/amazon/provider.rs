use chrono::Utc;
use tracing::{debug, info, warn};

use super::models::{GetItemsRequest, GetItemsResponse, Item, CONDITION_NEW, RESOURCES};
use super::signer::{PaapiSigner, GET_ITEMS_PATH};
use super::transport::{HttpTransport, OutboundRequest};
use crate::config::AppConfig;
use crate::error::ProviderError;

/// `GetItems` accepts at most ten ids per call.
pub const BATCH_SIZE: usize = 10;

const LOG_BODY_LIMIT: usize = 500;

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_len) {
        s.truncate(idx);
        s.push('…');
    }
    s
}

/// Split ids into consecutive batches of at most `size`, preserving order.
pub fn partition_batches(ids: &[String], size: usize) -> Vec<&[String]> {
    ids.chunks(size.max(1)).collect()
}

/// PA-API 5.0 client: one signed `GetItems` call per batch, strictly in
/// sequence. A non-2xx answer aborts the whole fetch; soft errors inside a
/// 2xx answer are only logged.
pub struct AmazonProvider<'a, T: HttpTransport> {
    cfg: &'a AppConfig,
    signer: PaapiSigner,
    transport: &'a T,
}

impl<'a, T: HttpTransport> AmazonProvider<'a, T> {
    pub fn new(cfg: &'a AppConfig, transport: &'a T) -> Self {
        Self {
            cfg,
            signer: PaapiSigner::from_config(cfg),
            transport,
        }
    }

    fn endpoint(&self) -> String {
        format!("https://{}{}", self.cfg.host, GET_ITEMS_PATH)
    }

    pub fn request_body(&self, ids: &[String]) -> Result<String, ProviderError> {
        let req = GetItemsRequest {
            item_ids: ids,
            partner_tag: &self.cfg.partner_tag,
            partner_type: &self.cfg.partner_type,
            marketplace: &self.cfg.marketplace,
            condition: CONDITION_NEW,
            resources: RESOURCES,
        };
        Ok(serde_json::to_string(&req)?)
    }

    /// Fetch one batch of at most [`BATCH_SIZE`] ids.
    pub async fn get_items(&self, ids: &[String]) -> Result<Vec<Item>, ProviderError> {
        let body = self.request_body(ids)?;
        let signed = self.signer.sign(&body, Utc::now());

        let resp = self
            .transport
            .post(OutboundRequest {
                url: self.endpoint(),
                headers: signed.headers,
                body,
            })
            .await?;

        if !resp.is_success() {
            return Err(ProviderError::Http {
                status: resp.status,
                body: truncate_for_log(resp.body, LOG_BODY_LIMIT),
            });
        }

        let decoded: GetItemsResponse = serde_json::from_str(&resp.body)?;
        for err in &decoded.errors {
            warn!(
                code = err.code.as_deref().unwrap_or("unknown"),
                message = err.message.as_deref().unwrap_or(""),
                "paapi: provider reported an error"
            );
        }

        Ok(decoded.into_items())
    }

    /// Fetch every id, batch after batch. The first failing batch aborts the
    /// run and discards everything collected so far.
    pub async fn fetch_all(&self, ids: &[String]) -> Result<Vec<Item>, ProviderError> {
        let batches = partition_batches(ids, BATCH_SIZE);
        let total = batches.len();
        let mut items = Vec::with_capacity(ids.len());

        for (idx, batch) in batches.into_iter().enumerate() {
            info!(
                batch = idx + 1,
                total,
                size = batch.len(),
                host = %self.cfg.host,
                "paapi: fetching batch"
            );
            let fetched = self.get_items(batch).await?;
            debug!(batch = idx + 1, items = fetched.len(), "paapi: batch done");
            items.extend(fetched);
        }

        Ok(items)
    }
}
