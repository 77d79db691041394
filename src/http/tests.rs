//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().base_url(server.uri()).build()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.user_agent.starts_with("sqlsink/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("http://localhost:9200")
        .timeout(Duration::from_secs(5))
        .build();

    assert_eq!(config.base_url, Some("http://localhost:9200".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn test_http_client_rejects_invalid_base_url() {
    let config = HttpClientConfig::builder().base_url("not a url").build();
    assert!(matches!(
        HttpClient::with_config(config),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new().text("application/x-ndjson", "{}\n");
    assert!(matches!(
        config.body,
        Some(RequestBody::Text { ref content_type, .. }) if content_type == "application/x-ndjson"
    ));

    let config = RequestConfig::new().json(serde_json::json!({"a": 1}));
    assert!(matches!(config.body, Some(RequestBody::Json(_))));
}

#[tokio::test]
async fn test_head_returns_status_without_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/present"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/absent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.head("/present").await.unwrap(), StatusCode::OK);
    assert_eq!(client.head("/absent").await.unwrap(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_json_and_parse_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/metrics"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "acknowledged": true
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .put("/metrics", serde_json::json!({"mappings": {}}))
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["acknowledged"], true);
}

#[tokio::test]
async fn test_post_text_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .and(header("content-type", "application/x-ndjson"))
        .and(body_string("{\"index\":{}}\n{}\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": false,
            "items": []
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body: serde_json::Value = client
        .request_json(
            Method::POST,
            "/_bulk",
            RequestConfig::new().text("application/x-ndjson", "{\"index\":{}}\n{}\n"),
        )
        .await
        .unwrap();
    assert_eq!(body["errors"], false);
}

#[tokio::test]
async fn test_error_status_maps_to_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/locked"))
        .respond_with(ResponseTemplate::new(403).set_body_string("index is read-only"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    match client.delete("/locked").await {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "index is read-only");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_request_is_sent_once_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.put("/flaky", serde_json::json!({})).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 503, .. })));
}

#[tokio::test]
async fn test_timeout_surfaces_as_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(50))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let result = client.put("/slow", serde_json::json!({})).await;
    match result {
        Err(Error::Http(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}
