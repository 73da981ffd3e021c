//! Music endpoints.
//!
//! - GET    /music/playlists               playlists with songs and memories
//! - POST   /music/playlists               create playlist
//! - DELETE /music/playlists/{id}          delete playlist
//! - POST   /music/playlists/{id}/songs    add song
//! - GET    /music/songs/{id}/memory       read song memory
//! - POST   /music/songs/{id}/memory       attach or replace song memory

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{body, ApiError, AppState};
use crate::lane::music;
use crate::lane::types::{PlaylistInput, SongInput};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/music/playlists", get(list_playlists).post(create_playlist))
        .route("/music/playlists/{id}", delete(delete_playlist))
        .route("/music/playlists/{id}/songs", post(add_song))
        .route(
            "/music/songs/{id}/memory",
            get(get_song_memory).post(set_song_memory),
        )
}

#[derive(Debug, Deserialize)]
struct SongMemoryBody {
    memory: String,
}

/// GET /music/playlists
async fn list_playlists(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let playlists = state.with_db(|conn, _| music::list_playlists(conn)).await?;
    Ok(Json(json!({"success": true, "playlists": playlists})))
}

/// POST /music/playlists
async fn create_playlist(
    State(state): State<AppState>,
    payload: Result<Json<PlaylistInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let playlist = state
        .with_db(move |conn, _| music::create_playlist(conn, &input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "playlist": playlist})),
    ))
}

/// DELETE /music/playlists/{id}
async fn delete_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = id.clone();
    state
        .with_db(move |conn, _| music::delete_playlist(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "deleted": deleted})))
}

/// POST /music/playlists/{id}/songs
async fn add_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let song = state
        .with_db(move |conn, _| music::add_song(conn, &id, &input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "song": song})),
    ))
}

/// GET /music/songs/{id}/memory
async fn get_song_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let memory = state
        .with_db(move |conn, _| music::get_song_memory(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "song_memory": memory})))
}

/// POST /music/songs/{id}/memory
async fn set_song_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongMemoryBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let SongMemoryBody { memory } = body(payload)?;
    let saved = state
        .with_db(move |conn, _| music::set_song_memory(conn, &id, &memory))
        .await?;
    tracing::info!(song_id = %saved.song_id, "song memory saved");
    Ok(Json(json!({"success": true, "song_memory": saved})))
}
