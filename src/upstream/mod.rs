use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod http;
pub mod stub;

/// Status and decoded JSON body of a completed upstream call.
///
/// `body` is `None` when a 2xx reply carried no content.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Anything that can go wrong while talking to the upstream API.
///
/// A non-2xx status is not an error; it comes back as an [`UpstreamResponse`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid JSON from upstream: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Fault(String),
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Issues one GET against `uri` and decodes the body as JSON.
    async fn get_json(&self, uri: &str) -> Result<UpstreamResponse, UpstreamError>;
}
