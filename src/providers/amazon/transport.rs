use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ProviderError;

/// One outbound POST, fully signed.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the batch fetcher and the network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, req: OutboundRequest) -> Result<RawResponse, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent(concat!("storefront-prices/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(30)))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, req: OutboundRequest) -> Result<RawResponse, ProviderError> {
        let mut builder = self.http.post(&req.url);
        for (name, value) in &req.headers {
            // Host is signed but derived from the URL by the client.
            if name.eq_ignore_ascii_case("host") {
                continue;
            }
            builder = builder.header(*name, value);
        }
        let resp = builder.body(req.body).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(RawResponse { status, body })
    }
}


/// Scripted transport for tests: replays queued responses in order and
/// records every request it receives.
#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        requests: Mutex<Vec<OutboundRequest>>,
    }

    impl MockTransport {
        pub fn new(responses: impl IntoIterator<Item = RawResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn ok(body: serde_json::Value) -> RawResponse {
            RawResponse { status: 200, body: body.to_string() }
        }

        pub fn status(status: u16, body: &str) -> RawResponse {
            RawResponse { status, body: body.to_string() }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn requests(&self) -> Vec<OutboundRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn post(&self, req: OutboundRequest) -> Result<RawResponse, ProviderError> {
            self.requests.lock().unwrap().push(req);
            let next = self.responses.lock().unwrap().pop_front();
            Ok(next.unwrap_or_else(|| Self::status(599, "mock transport exhausted")))
        }
    }
}
