use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::upstream::{UpstreamClient, UpstreamError, UpstreamResponse};

const USER_AGENT: &str = concat!("photo-search-proxy/", env!("CARGO_PKG_VERSION"));

/// Upstream client backed by a pooled `reqwest` client.
///
/// No request timeout is configured; the hosting platform owns that.
pub struct HttpUpstream {
    http_client: Client,
}

impl HttpUpstream {
    pub fn new() -> Result<Self, UpstreamError> {
        let http_client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn get_json(&self, uri: &str) -> Result<UpstreamResponse, UpstreamError> {
        // The URI carries the API key, so it is stripped from transport errors.
        let response = self
            .http_client
            .get(uri)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url()))?;
        let body = if bytes.trim_ascii().is_empty() && (200..300).contains(&status) {
            None
        } else {
            Some(serde_json::from_slice::<Value>(&bytes)?)
        };
        Ok(UpstreamResponse { status, body })
    }
}
