use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photo_search_proxy::{
    api::{router, AppState},
    config::Config,
    upstream::{http::HttpUpstream, stub::StubUpstream},
};

fn app_against(mock_server: &MockServer) -> axum::Router {
    let config = Config::new(
        "test",
        "some-api-key",
        format!("{}/services/rest", mock_server.uri()),
    );
    let upstream = Arc::new(HttpUpstream::new().unwrap());
    router(Arc::new(AppState::new(config, upstream)))
}

fn app(stub: Arc<StubUpstream>) -> axum::Router {
    let config = Config::new("test", "some-api-key", "https://api.example/rest");
    router(Arc::new(AppState::new(config, stub)))
}

#[tokio::test]
async fn recent_forwards_paging_parameters_only() {
    let stub = Arc::new(StubUpstream::responding(200, json!({"photos": {"page": 2}})));

    let request = Request::builder()
        .uri("/photos/recent?page=2&text=ignored&per_page=10&extras=url_m")
        .header("authorization", "test")
        .body(Body::empty())
        .unwrap();

    let response = app(stub.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body_bytes[..], br#"{"photos":{"page":2}}"#);
    assert_eq!(
        stub.requested_uris().await,
        vec![
            "https://api.example/rest?method=flickr.photos.getRecent&api_key=some-api-key&format=json&nojsoncallback=1&extras=url_m&per_page=10&page=2"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn recent_hides_upstream_server_errors() {
    let stub = Arc::new(StubUpstream::responding(503, json!({"stat": "fail", "message": "down"})));

    let request = Request::builder()
        .uri("/photos/recent?page=1")
        .header("authorization", "test")
        .body(Body::empty())
        .unwrap();

    let response = app(stub).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(v, json!({"error": "internal service error"}));
}

#[tokio::test]
async fn recent_requires_token() {
    let stub = Arc::new(StubUpstream::responding(200, json!({})));

    let request = Request::builder()
        .uri("/photos/recent")
        .body(Body::empty())
        .unwrap();

    let response = app(stub.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(stub.requested_uris().await.is_empty());
}

#[tokio::test]
async fn recent_passes_no_content_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest"))
        .and(query_param("method", "flickr.photos.getRecent"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .uri("/photos/recent?page=1")
        .header("authorization", "test")
        .body(Body::empty())
        .unwrap();

    let response = app_against(&mock_server).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body_bytes.is_empty());
}

#[tokio::test]
async fn recent_passes_created_through_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/rest"))
        .and(query_param("method", "flickr.photos.getRecent"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"stat": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .uri("/photos/recent?page=1")
        .header("authorization", "test")
        .body(Body::empty())
        .unwrap();

    let response = app_against(&mock_server).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body_bytes[..], br#"{"stat":"ok"}"#);
}
