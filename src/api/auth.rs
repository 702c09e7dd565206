use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::api::{error::AppError, AppState};
use crate::engine::authorizer::TokenAuthorizerEvent;

const ARN_PREFIX: &str = "arn:aws:execute-api:local:local:gateway/v1";

/// Reads the presented token from the `Authorization` header.
///
/// A leading `Bearer ` is stripped; anything else is taken verbatim.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())?
        .trim();
    if auth_header.is_empty() {
        return None;
    }
    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);
    Some(token.to_string())
}

pub fn method_arn(method: &Method, path: &str) -> String {
    format!("{}/{}{}", ARN_PREFIX, method, path)
}

/// Runs the token authorizer and enforces its policy before the route.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(request.headers()) else {
        tracing::debug!(path = %request.uri().path(), "request without token");
        return Err(AppError::Unauthorized);
    };
    let arn = method_arn(request.method(), request.uri().path());
    let event = TokenAuthorizerEvent {
        authorization_token: token,
        method_arn: arn.clone(),
        ..TokenAuthorizerEvent::default()
    };

    let result = state.authorizer.evaluate(&event)?;
    if !result.policy_document.permits(&arn) {
        tracing::info!(method_arn = %arn, "request denied by policy");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
