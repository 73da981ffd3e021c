//! Album endpoints.
//!
//! - GET    /albums         list albums
//! - POST   /albums         create album
//! - GET    /albums/{id}    album with its media
//! - PUT    /albums/{id}    replace album fields
//! - DELETE /albums/{id}    delete album, detach its media

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::{body, ApiError, AppState};
use crate::lane::albums;
use crate::lane::media::{list_media, MediaFilter};
use crate::lane::types::AlbumInput;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/albums", get(list).post(create))
        .route("/albums/{id}", get(detail).put(update).delete(remove))
}

/// GET /albums
async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let albums = state.with_db(|conn, _| albums::list_albums(conn)).await?;
    Ok(Json(json!({"success": true, "albums": albums})))
}

/// POST /albums
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<AlbumInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let album = state
        .with_db(move |conn, _| albums::create_album(conn, &input))
        .await?;
    tracing::info!(id = %album.id, "album created");
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "album": album})),
    ))
}

/// GET /albums/{id}
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (album, media) = state
        .with_db(move |conn, _| {
            let album = albums::get_album(conn, &id)?;
            let media = list_media(
                conn,
                &MediaFilter {
                    category: None,
                    album_id: Some(id),
                },
            )?;
            Ok((album, media))
        })
        .await?;
    Ok(Json(json!({"success": true, "album": album, "media": media})))
}

/// PUT /albums/{id}
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AlbumInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body(payload)?;
    let album = state
        .with_db(move |conn, _| albums::update_album(conn, &id, &input))
        .await?;
    Ok(Json(json!({"success": true, "album": album})))
}

/// DELETE /albums/{id}
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = id.clone();
    state
        .with_db(move |conn, _| albums::delete_album(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "deleted": deleted})))
}
