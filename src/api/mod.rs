use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::engine::{authorizer::Authorizer, ProxyEngine};
use crate::upstream::UpstreamClient;

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;

/// Read-only state shared by every request.
pub struct AppState {
    pub authorizer: Authorizer,
    pub engine: ProxyEngine,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self {
            authorizer: Authorizer::new(config.api_token),
            engine: ProxyEngine::new(config.api_url, config.api_key, upstream),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/photos/search", get(routes::search_photos))
        .route("/photos/recent", get(routes::recent_photos))
        .route("/invoke/search", post(routes::invoke_search))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .merge(protected)
        .route("/authorizer", post(routes::authorize_token))
        .route("/healthz", get(routes::healthz))
        .route("/metrics", get(routes::metrics))
        .with_state(state)
}
