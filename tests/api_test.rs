mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = helpers::test_app();
    let (status, body) = app.get("/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = helpers::test_app();
    let request = Request::post(helpers::url("/albums"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn missing_required_field_is_bad_request() {
    let app = helpers::test_app();
    let (status, body) = app.post_json("/albums", json!({"description": "no name"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = helpers::test_app();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn stats_count_every_resource() {
    let app = helpers::test_app();
    app.post_json("/albums", json!({"name": "A"})).await;
    app.post_json("/timeline", json!({"title": "T", "year": 1950})).await;
    app.post_json("/timeline", json!({"title": "U", "year": 2020})).await;
    app.post_json("/stories", json!({"title": "S"})).await;
    app.post_json(
        "/music/playlists",
        json!({"name": "P", "songs": [{"title": "one"}, {"title": "two"}]}),
    )
    .await;
    app.send(helpers::multipart_request("/upload/photo", "p.jpg", "image/jpeg", b"1234", &[]))
        .await;

    let (status, body) = app.get("/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["stats"];
    assert_eq!(stats["albums"], 1);
    assert_eq!(stats["timeline_events"], 2);
    assert_eq!(stats["stories"], 1);
    assert_eq!(stats["playlists"], 1);
    assert_eq!(stats["songs"], 2);
    assert_eq!(stats["media_by_category"]["photo"], 1);
    assert_eq!(stats["media_bytes"], 4);
    assert_eq!(stats["earliest_year"], 1950);
    assert_eq!(stats["latest_year"], 2020);
    assert!(stats["last_activity"].is_string());
}
