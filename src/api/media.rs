//! Upload and media endpoints.
//!
//! - POST   /upload/photo | /upload/video | /upload/voice
//! - GET    /media              list media (`?category=`, `?album_id=`)
//! - GET    /media/{id}/file    stored bytes
//! - DELETE /media/{id}         delete media and its file
//!
//! Uploads take either `multipart/form-data` (a `file` part plus optional `album_id` and
//! `caption` parts) or a JSON body carrying base64 data, which is how the browser sends
//! recorded voice notes.

use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{query, ApiError, AppState, API_PREFIX};
use crate::lane::media::{decode_base64_payload, list_media, MediaFilter, NewUpload};
use crate::lane::types::MediaCategory;

pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    // room for base64 expansion and multipart framing; the exact cap is enforced on save
    let body_limit = max_upload_bytes.saturating_mul(4) / 3 + 64 * 1024;
    Router::new()
        .route(
            "/upload/{category}",
            post(upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/media", get(list))
        .route("/media/{id}", delete(remove))
        .route("/media/{id}/file", get(file))
}

/// Upload fields common to both body encodings.
#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
    album_id: Option<String>,
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Base64Upload {
    filename: Option<String>,
    data: String,
    content_type: Option<String>,
    album_id: Option<String>,
    caption: Option<String>,
}

/// POST /upload/{category}
async fn upload(
    State(state): State<AppState>,
    Path(category): Path<String>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let category: MediaCategory = category
        .parse()
        .map_err(|_| ApiError::NotFound(format!("unknown upload category: {category}")))?;

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let form = if is_multipart {
        read_multipart(request, &state).await?
    } else {
        read_base64(request, &state).await?
    };

    let media = state
        .with_db(move |conn, store| {
            store.save(
                conn,
                NewUpload {
                    category,
                    original_filename: form.filename.as_deref(),
                    content_type: form.content_type.as_deref(),
                    data: &form.data,
                    album_id: form.album_id.as_deref(),
                    caption: form.caption.as_deref(),
                },
            )
        })
        .await?;

    let url = format!("{API_PREFIX}/media/{}/file", media.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "media": media, "url": url})),
    ))
}

async fn read_multipart(request: Request, state: &AppState) -> Result<UploadForm, ApiError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut form = UploadForm::default();
    let mut saw_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                form.filename = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                form.data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("read error: {e}")))?
                    .to_vec();
                saw_file = true;
            }
            Some("album_id") | Some("caption") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("read error: {e}")))?;
                if name.as_deref() == Some("album_id") {
                    form.album_id = Some(value);
                } else {
                    form.caption = Some(value);
                }
            }
            _ => {}
        }
    }

    if !saw_file {
        return Err(ApiError::BadRequest("missing 'file' part in multipart form".into()));
    }
    Ok(form)
}

async fn read_base64(request: Request, state: &AppState) -> Result<UploadForm, ApiError> {
    let Json(payload) = Json::<Base64Upload>::from_request(request, state).await?;
    let (data, data_url_mime) = decode_base64_payload(&payload.data)?;
    Ok(UploadForm {
        filename: payload.filename,
        content_type: payload.content_type.or(data_url_mime),
        data,
        album_id: payload.album_id,
        caption: payload.caption,
    })
}

#[derive(Debug, Deserialize)]
struct MediaQuery {
    category: Option<String>,
    album_id: Option<String>,
}

/// GET /media
async fn list(
    State(state): State<AppState>,
    params: Result<Query<MediaQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query(params)?;
    let category = params
        .category
        .as_deref()
        .map(str::parse::<MediaCategory>)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let filter = MediaFilter {
        category,
        album_id: params.album_id,
    };
    let media = state
        .with_db(move |conn, _| list_media(conn, &filter))
        .await?;
    Ok(Json(json!({"success": true, "media": media})))
}

/// GET /media/{id}/file
async fn file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (media, bytes) = state
        .with_db(move |conn, store| store.read(conn, &id))
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, media.content_type),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        bytes,
    ))
}

/// DELETE /media/{id}
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = id.clone();
    state
        .with_db(move |conn, store| store.delete(conn, &id))
        .await?;
    Ok(Json(json!({"success": true, "deleted": deleted})))
}
