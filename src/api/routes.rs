use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::{
    dto::{HealthResponse, ProxyEvent},
    error::AppError,
    AppState,
};
use crate::engine::{
    authorizer::{AuthorizerResult, TokenAuthorizerEvent},
    envelope::ResponseEnvelope,
    query::QueryParameters,
};

pub async fn search_photos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryParameters>, QueryRejection>,
) -> Result<ResponseEnvelope, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(state.engine.proxy_search(Some(&params)).await)
}

pub async fn recent_photos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryParameters>, QueryRejection>,
) -> Result<ResponseEnvelope, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(state.engine.proxy_recent(Some(&params)).await)
}

/// Token authorizer endpoint: returns the policy document for an event.
///
/// Unreadable events are reported as the same opaque `Unauthorized` fault.
pub async fn authorize_token(
    State(state): State<Arc<AppState>>,
    event: Result<Json<TokenAuthorizerEvent>, JsonRejection>,
) -> Result<Json<AuthorizerResult>, AppError> {
    let Json(event) = event.map_err(|e| {
        tracing::debug!(error = %e.body_text(), "unreadable authorizer event");
        AppError::Unauthorized
    })?;
    let result = state.authorizer.evaluate(&event)?;
    Ok(Json(result))
}

/// Proxy endpoint that takes a gateway event and returns the raw envelope.
pub async fn invoke_search(
    State(state): State<Arc<AppState>>,
    event: Result<Json<ProxyEvent>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let Json(event) = event.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let envelope = state
        .engine
        .proxy_search(event.query_string_parameters.as_ref())
        .await;
    Ok(Json(envelope))
}

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    match &state.metrics {
        Some(handle) => Ok(handle.render().into_response()),
        None => Err(AppError::NotFound("metrics recorder not installed".to_string())),
    }
}
