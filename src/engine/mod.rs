use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use crate::upstream::{UpstreamClient, UpstreamError, UpstreamResponse};

pub mod authorizer;
pub mod envelope;
pub mod query;

use envelope::ResponseEnvelope;
use query::{build_method_uri, redact_api_key, QueryParameters, RECENT_METHOD, SEARCH_METHOD};

/// Parameters the recent-photos route forwards, in emission order.
pub const RECENT_PARAMETERS: [&str; 3] = ["extras", "per_page", "page"];

/// Proxies caller requests to the upstream photo API and normalizes replies.
pub struct ProxyEngine {
    base_url: String,
    api_key: SecretString,
    upstream: Arc<dyn UpstreamClient>,
}

impl ProxyEngine {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            upstream,
        }
    }

    /// Forwards a search and returns the upstream reply as an envelope.
    ///
    /// Upstream status codes pass through unchanged; any failure becomes a
    /// 500 envelope carrying the failure message.
    pub async fn proxy_search(&self, params: Option<&QueryParameters>) -> ResponseEnvelope {
        metrics::counter!("requests_total", "endpoint" => "search").increment(1);
        match self.call(SEARCH_METHOD, params).await {
            Ok(response) => passthrough(response),
            Err(e) => failure_envelope(e),
        }
    }

    /// Forwards a recent-photos listing with gateway-style status mapping.
    pub async fn proxy_recent(&self, params: Option<&QueryParameters>) -> ResponseEnvelope {
        metrics::counter!("requests_total", "endpoint" => "recent").increment(1);
        let selected = params.map(|p| p.select(&RECENT_PARAMETERS));
        match self.call(RECENT_METHOD, selected.as_ref()).await {
            Ok(response) => map_integration_response(response),
            Err(e) => failure_envelope(e),
        }
    }

    async fn call(
        &self,
        method: &str,
        params: Option<&QueryParameters>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let api_key = self.api_key.expose_secret();
        let uri = build_method_uri(&self.base_url, method, api_key, params);
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("upstream", %request_id, method);

        async {
            tracing::debug!(uri = %redact_api_key(&uri, api_key), "calling upstream");
            let start = std::time::Instant::now();
            let result = self.upstream.get_json(&uri).await;
            metrics::histogram!("upstream_latency_ms", "method" => method.to_string())
                .record(start.elapsed().as_millis() as f64);
            match &result {
                Ok(response) => tracing::info!(status = response.status, "upstream replied"),
                Err(e) => tracing::warn!(error = %e, "upstream call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

fn failure_envelope(error: UpstreamError) -> ResponseEnvelope {
    metrics::counter!("upstream_failures_total").increment(1);
    ResponseEnvelope::error(500, &error.to_string())
}

fn map_integration_response(response: UpstreamResponse) -> ResponseEnvelope {
    match response.status {
        400 => ResponseEnvelope::error(400, "bad input"),
        403 => ResponseEnvelope::error(403, "forbidden"),
        404 => ResponseEnvelope::error(404, "not found"),
        500..=599 => ResponseEnvelope::error(500, "internal service error"),
        _ => passthrough(response),
    }
}

fn passthrough(response: UpstreamResponse) -> ResponseEnvelope {
    match response.body {
        Some(body) => ResponseEnvelope::respond(response.status, &body),
        None => ResponseEnvelope::empty(response.status),
    }
}
