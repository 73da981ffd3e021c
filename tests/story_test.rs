mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn put_replaces_content_and_preserves_id() {
    let app = helpers::test_app();
    let (status, created) = app
        .post_json(
            "/stories",
            json!({"title": "The flood", "content": "It rained for days."}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["story"]["type"], "written");
    let id = created["story"]["id"].as_str().unwrap();

    let (status, updated) = app
        .put_json(
            &format!("/stories/{id}"),
            json!({"title": "The great flood", "content": "It rained for a week.", "type": "written"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["story"]["id"], id);
    assert_eq!(updated["story"]["title"], "The great flood");
    assert_eq!(updated["story"]["created_at"], created["story"]["created_at"]);

    let (_, detail) = app.get(&format!("/stories/{id}")).await;
    assert_eq!(detail["story"]["content"], "It rained for a week.");

    let (_, list) = app.get("/stories").await;
    assert_eq!(list["stories"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn audio_story_keeps_type_and_payload() {
    let app = helpers::test_app();
    let (_, created) = app
        .post_json(
            "/stories",
            json!({"title": "Grandpa sings", "type": "audio", "content": "UklGRg=="}),
        )
        .await;
    assert_eq!(created["story"]["type"], "audio");
    assert_eq!(created["story"]["content"], "UklGRg==");
}

#[tokio::test]
async fn unknown_story_type_is_bad_request() {
    let app = helpers::test_app();
    let (status, body) = app
        .post_json("/stories", json!({"title": "x", "type": "hologram"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn put_on_missing_story_is_not_found() {
    let app = helpers::test_app();
    let (status, _) = app
        .put_json("/stories/nope", json!({"title": "x", "content": "y"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prompts_are_served() {
    let app = helpers::test_app();
    let (status, body) = app.get("/stories/prompts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(!body["prompts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleted_story_is_gone() {
    let app = helpers::test_app();
    let (_, created) = app.post_json("/stories", json!({"title": "Temp"})).await;
    let id = created["story"]["id"].as_str().unwrap();

    let (status, _) = app.delete(&format!("/stories/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/stories/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
