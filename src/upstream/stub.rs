use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::upstream::{UpstreamClient, UpstreamError, UpstreamResponse};

/// Canned upstream for local runs and tests.
///
/// Every call gets the same reply, and each requested URI is recorded.
pub struct StubUpstream {
    reply: StubReply,
    requested: Mutex<Vec<String>>,
}

enum StubReply {
    Respond { status: u16, body: Option<Value> },
    Fail(String),
}

impl StubUpstream {
    pub fn responding(status: u16, body: Value) -> Self {
        Self {
            reply: StubReply::Respond { status, body: Some(body) },
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `status` and no body.
    pub fn empty(status: u16) -> Self {
        Self {
            reply: StubReply::Respond { status, body: None },
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: StubReply::Fail(message.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub async fn requested_uris(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl UpstreamClient for StubUpstream {
    async fn get_json(&self, uri: &str) -> Result<UpstreamResponse, UpstreamError> {
        self.requested.lock().await.push(uri.to_string());
        match &self.reply {
            StubReply::Respond { status, body } => Ok(UpstreamResponse {
                status: *status,
                body: body.clone(),
            }),
            StubReply::Fail(message) => Err(UpstreamError::Fault(message.clone())),
        }
    }
}
