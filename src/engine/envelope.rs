use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Headers attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeHeaders {
    #[serde(rename = "Access-Control-Allow-Credentials")]
    pub allow_credentials: bool,
    #[serde(rename = "Access-Control-Allow-Origin")]
    pub allow_origin: String,
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl Default for EnvelopeHeaders {
    fn default() -> Self {
        Self {
            allow_credentials: true,
            allow_origin: "*".to_string(),
            content_type: "application/json".to_string(),
        }
    }
}

/// Uniform `{statusCode, body, headers}` reply for every proxied request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub body: String,
    pub headers: EnvelopeHeaders,
}

impl ResponseEnvelope {
    pub fn respond(status_code: u16, data: &Value) -> Self {
        let body = serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string());
        Self {
            status_code,
            body,
            headers: EnvelopeHeaders::default(),
        }
    }

    /// Envelope for an upstream reply that had no content.
    pub fn empty(status_code: u16) -> Self {
        Self {
            status_code,
            body: String::new(),
            headers: EnvelopeHeaders::default(),
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        Self::respond(status_code, &json!({ "error": message }))
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_GATEWAY);
        let allow_origin = HeaderValue::from_str(&self.headers.allow_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("*"));
        let content_type = HeaderValue::from_str(&self.headers.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/json"));
        let allow_credentials = HeaderValue::from_static(if self.headers.allow_credentials {
            "true"
        } else {
            "false"
        });
        (
            status,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin),
                (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, allow_credentials),
                (header::CONTENT_TYPE, content_type),
            ],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respond_serializes_data_with_fixed_headers() {
        let envelope = ResponseEnvelope::respond(200, &json!({"test": "test"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "statusCode": 200,
                "body": "{\"test\":\"test\"}",
                "headers": {
                    "Access-Control-Allow-Credentials": true,
                    "Access-Control-Allow-Origin": "*",
                    "Content-Type": "application/json"
                }
            })
        );
    }

    #[test]
    fn body_keeps_upstream_key_order() {
        let data: Value =
            serde_json::from_str(r#"{"photos":{"page":1},"stat":"ok","a":0}"#).unwrap();
        let envelope = ResponseEnvelope::respond(200, &data);
        assert_eq!(envelope.body, r#"{"photos":{"page":1},"stat":"ok","a":0}"#);
    }

    #[test]
    fn renders_as_http_response() {
        let response = ResponseEnvelope::error(500, "Blam").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }
}
