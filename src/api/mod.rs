//! HTTP surface for Memory Lane, mounted under `/api/memory-lane`.
//!
//! Every handler runs its database work on the blocking pool through
//! [`AppState::with_db`], which holds the shared connection lock for the duration of
//! one record-engine call. Responses use a small envelope: `{"success": true, ...}`
//! on success, `{"success": false, "error": "..."}` with a matching status on failure.

pub mod albums;
pub mod media;
pub mod music;
pub mod stories;
pub mod timeline;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

use crate::config::LaneConfig;
use crate::error::LaneError;
use crate::lane::media::MediaStore;

/// Base path of every route.
pub const API_PREFIX: &str = "/api/memory-lane";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    media: Arc<MediaStore>,
    config: Arc<LaneConfig>,
    db_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(conn: Connection, config: LaneConfig, db_path: Option<PathBuf>) -> Self {
        let media = MediaStore::new(config.resolved_media_dir(), config.api.max_upload_bytes);
        Self {
            db: Arc::new(Mutex::new(conn)),
            media: Arc::new(media),
            config: Arc::new(config),
            db_path,
        }
    }

    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Run `f` against the shared connection on the blocking pool.
    pub(crate) async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection, &MediaStore) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let media = Arc::clone(&self.media);
        tokio::task::spawn_blocking(move || {
            // an unfinished transaction rolls back when dropped, so a poisoned lock
            // still guards a consistent connection
            let mut conn = db.lock().unwrap_or_else(|poisoned| {
                tracing::warn!("recovering db lock after a panicked request");
                poisoned.into_inner()
            });
            f(&mut conn, &media).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("db task failed: {e}")))?
    }
}

/// Error half of every handler.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<LaneError> for ApiError {
    fn from(err: LaneError) -> Self {
        match err {
            LaneError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            LaneError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({"success": false, "error": message}))).into_response()
    }
}

/// Unwrap a JSON body, turning extractor rejections into the error envelope.
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(ApiError::from)
}

pub(crate) fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params.map(|Query(value)| value).map_err(ApiError::from)
}

/// Build the full router, state applied.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .merge(albums::routes())
        .merge(timeline::routes())
        .merge(stories::routes())
        .merge(music::routes())
        .merge(media::routes(state.config.api.max_upload_bytes));

    Router::new()
        .nest(API_PREFIX, routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({"success": true, "status": "ok"}))
}

/// GET /stats
async fn stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let db_path = state.db_path.clone();
    let stats = state
        .with_db(move |conn, _| crate::lane::stats::lane_stats(conn, db_path.as_deref()))
        .await?;
    Ok(Json(json!({"success": true, "stats": stats})))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".into())
}
