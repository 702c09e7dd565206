use serde::{Deserialize, Serialize};

use crate::engine::query::QueryParameters;

// ---- Proxy invocation ----
/// Gateway proxy event. Only the query string parameters are read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    #[serde(default)]
    pub query_string_parameters: Option<QueryParameters>,
}

// ---- Health ----
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
