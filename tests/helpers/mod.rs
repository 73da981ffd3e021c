#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use memory_lane::api::{self, AppState};
use memory_lane::config::LaneConfig;
use memory_lane::db;
use rusqlite::Connection;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// A router over an in-memory database and a throwaway media folder.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media_dir: TempDir,
}

pub fn test_app() -> TestApp {
    test_app_with(|_| {})
}

/// Like [`test_app`], with a hook to adjust the config first.
pub fn test_app_with(adjust: impl FnOnce(&mut LaneConfig)) -> TestApp {
    let media_dir = TempDir::new().unwrap();
    let mut config = LaneConfig::default();
    config.storage.media_dir = media_dir.path().to_string_lossy().into_owned();
    adjust(&mut config);

    let state = AppState::new(test_db(), config, None);
    state.media().ensure_dirs().unwrap();
    let router = api::router(state.clone());
    TestApp {
        router,
        state,
        media_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Request::get(url(path)).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(Request::delete(url(path)).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", path, &body)).await
    }

    pub async fn put_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", path, &body)).await
    }

    /// Raw bytes of a GET, for file downloads.
    pub async fn get_bytes(&self, path: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(url(path)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, bytes.to_vec())
    }
}

/// Prefix a resource path with the API base.
pub fn url(path: &str) -> String {
    format!("{}{path}", api::API_PREFIX)
}

pub fn json_request(method: &str, path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(url(path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub const BOUNDARY: &str = "lane-test-boundary";

/// Build a multipart/form-data upload with a `file` part and optional text parts.
pub fn multipart_request(
    path: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
    fields: &[(&str, &str)],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post(url(path))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
