mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn playlist_is_created_with_its_songs() {
    let app = helpers::test_app();
    let (status, body) = app
        .post_json(
            "/music/playlists",
            json!({
                "name": "Dancing in the kitchen",
                "songs": [
                    {"title": "Moon River", "artist": "Andy Williams", "year": 1962},
                    {"title": "Stand By Me"}
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let songs = body["playlist"]["songs"].as_array().unwrap();
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0]["title"], "Moon River");
    assert_eq!(songs[1]["title"], "Stand By Me");
    assert!(songs[1]["artist"].is_null());
}

#[tokio::test]
async fn memory_attaches_to_song_and_shows_in_listing() {
    let app = helpers::test_app();
    let (_, created) = app
        .post_json(
            "/music/playlists",
            json!({"name": "Road trips", "songs": [{"title": "Take Me Home, Country Roads"}]}),
        )
        .await;
    let song_id = created["playlist"]["songs"][0]["id"].as_str().unwrap();

    let (status, saved) = app
        .post_json(
            &format!("/music/songs/{song_id}/memory"),
            json!({"memory": "Singing it with the windows down in '79."}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["song_memory"]["song_id"], song_id);

    // posting again replaces rather than duplicates
    app.post_json(
        &format!("/music/songs/{song_id}/memory"),
        json!({"memory": "Every summer, all the way to Grandma's."}),
    )
    .await;

    let (_, fetched) = app.get(&format!("/music/songs/{song_id}/memory")).await;
    assert_eq!(fetched["song_memory"]["memory"], "Every summer, all the way to Grandma's.");

    let (_, list) = app.get("/music/playlists").await;
    assert_eq!(
        list["playlists"][0]["songs"][0]["memory"],
        "Every summer, all the way to Grandma's."
    );
}

#[tokio::test]
async fn memory_for_unknown_song_is_not_found() {
    let app = helpers::test_app();
    let (status, body) = app
        .post_json("/music/songs/ghost/memory", json!({"memory": "?"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = app.get("/music/songs/ghost/memory").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn songs_can_be_appended_and_playlist_deleted() {
    let app = helpers::test_app();
    let (_, created) = app
        .post_json("/music/playlists", json!({"name": "Lullabies"}))
        .await;
    let playlist_id = created["playlist"]["id"].as_str().unwrap();

    let (status, song) = app
        .post_json(
            &format!("/music/playlists/{playlist_id}/songs"),
            json!({"title": "Twinkle Twinkle"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let song_id = song["song"]["id"].as_str().unwrap();

    app.post_json(
        &format!("/music/songs/{song_id}/memory"),
        json!({"memory": "Bedtime"}),
    )
    .await;

    let (status, _) = app.delete(&format!("/music/playlists/{playlist_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.get("/music/playlists").await;
    assert!(list["playlists"].as_array().unwrap().is_empty());
    let (status, _) = app.get(&format!("/music/songs/{song_id}/memory")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adding_song_to_missing_playlist_is_not_found() {
    let app = helpers::test_app();
    let (status, _) = app
        .post_json("/music/playlists/none/songs", json!({"title": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
