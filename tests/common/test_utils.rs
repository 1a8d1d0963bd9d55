use super::mocks::MockInferenceClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use peti_backend::{
    cases::CaseStore,
    config::{Config, RunpodConfig},
    runpod::InferenceClient,
    server::{self, handlers::AppState},
    upload::UploadPolicy,
};
use serde_json::Value;
use std::sync::Arc;

pub const BOUNDARY: &str = "peti-test-boundary";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.logs.level = "debug".to_string();
    config
}

/// Runpod settings pointing at a mock server
pub fn runpod_config(base_url: &str) -> RunpodConfig {
    RunpodConfig {
        base_url: base_url.to_string(),
        endpoint_id: "test-endpoint".to_string(),
        api_key: "test-api-key".to_string(),
        timeout_secs: 1,
        poll_interval_ms: 10,
        max_poll_attempts: 5,
        ..RunpodConfig::default()
    }
}

/// Build the router around an optional mock client
pub fn create_test_app(mock: Option<Arc<MockInferenceClient>>) -> (Router, AppState) {
    create_test_app_with_config(mock, &create_test_config())
}

pub fn create_test_app_with_config(
    mock: Option<Arc<MockInferenceClient>>,
    config: &Config,
) -> (Router, AppState) {
    let state = AppState {
        cases: Arc::new(CaseStore::new()),
        inference: mock.map(|m| m as Arc<dyn InferenceClient>),
        upload: Arc::new(UploadPolicy::new(&config.upload)),
    };
    let app = server::router(state.clone(), &config.server).unwrap();
    (app, state)
}

pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// Encode parts as a multipart/form-data POST to `uri`
pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Fake JPEG payload, content is irrelevant to the relay
pub fn sample_image() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.extend_from_slice(b"pet-eye-sample");
    data
}
